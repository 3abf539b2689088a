//! Command-line surface.
//!
//! Two invocation shapes:
//! ```text
//! heartbeat SERVICE_ID HOST PORT REGISTRY_HOST REGISTRY_PORT [INTERVAL]
//! heartbeat --all REGISTRY_HOST REGISTRY_PORT ID:HOST:PORT [ID:HOST:PORT ...]
//! ```
//! With `--config`, positional arguments may be omitted and the file's
//! registry and targets are used. Positional values override the file; flags
//! override both.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::config::{
    load_config, validate_config, ConfigError, MonitorConfig, RegistryBackend, TargetConfig,
    ValidationError,
};
use crate::monitor::{parse_port, Target, TargetParseError};

pub const USAGE: &str = "heartbeat [OPTIONS] SERVICE_ID HOST PORT REGISTRY_HOST REGISTRY_PORT [INTERVAL]\n       \
heartbeat [OPTIONS] --all REGISTRY_HOST REGISTRY_PORT ID:HOST:PORT [ID:HOST:PORT ...]\n       \
heartbeat [OPTIONS] --config PATH";

#[derive(Debug, Parser)]
#[command(name = "heartbeat")]
#[command(about = "Probe service health endpoints and publish status to a registry", long_about = None)]
#[command(override_usage = USAGE)]
pub struct Cli {
    /// Monitor several ID:HOST:PORT endpoints from one process
    #[arg(long)]
    pub all: bool,

    /// TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Seconds to sleep between cycles
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,

    /// Probe deadline in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Keep status in memory instead of writing to the registry
    #[arg(long)]
    pub dry_run: bool,

    /// Serve Prometheus metrics on this address
    #[arg(long, value_name = "ADDR")]
    pub metrics_address: Option<String>,

    /// Positional arguments, see usage
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,
}

/// Invocation problems, all reported before any probing starts.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Target(#[from] TargetParseError),

    #[error("invalid {name} '{value}'")]
    Number { name: &'static str, value: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<Vec<ValidationError>> for CliError {
    fn from(errors: Vec<ValidationError>) -> Self {
        CliError::Config(ConfigError::Validation(errors))
    }
}

fn port_arg(name: &'static str, value: &str) -> Result<u16, CliError> {
    parse_port(value).ok_or_else(|| CliError::Number { name, value: value.to_string() })
}

fn secs_arg(name: &'static str, value: &str) -> Result<u64, CliError> {
    value
        .parse::<u64>()
        .map_err(|_| CliError::Number { name, value: value.to_string() })
}

impl Cli {
    /// Merge the config file, positional arguments and flags into one
    /// validated configuration with at least one target.
    pub fn resolve(&self) -> Result<MonitorConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => MonitorConfig::default(),
        };

        if self.all {
            self.apply_fan_out(&mut config)?;
        } else if !self.args.is_empty() {
            self.apply_single(&mut config)?;
        } else if self.config.is_none() {
            return Err(CliError::Usage("missing arguments".to_string()));
        }

        if let Some(interval) = self.interval {
            config.poll.interval_secs = interval;
        }
        if let Some(timeout) = self.timeout {
            config.probe.timeout_secs = timeout;
        }
        if self.dry_run {
            config.registry.backend = RegistryBackend::Memory;
        }
        if let Some(addr) = &self.metrics_address {
            config.observability.metrics_enabled = true;
            config.observability.metrics_address = addr.clone();
        }

        if config.targets.is_empty() {
            return Err(CliError::Usage("no targets to monitor".to_string()));
        }
        validate_config(&config)?;

        Ok(config)
    }

    fn apply_single(&self, config: &mut MonitorConfig) -> Result<(), CliError> {
        let (id, host, port, registry_host, registry_port, interval) = match self.args.as_slice() {
            [id, host, port, rhost, rport] => (id, host, port, rhost, rport, None),
            [id, host, port, rhost, rport, interval] => (id, host, port, rhost, rport, Some(interval)),
            args => {
                return Err(CliError::Usage(format!(
                    "expected 5 or 6 arguments, got {}",
                    args.len()
                )))
            }
        };

        let target = Target::new(id.as_str(), host.as_str(), port_arg("PORT", port)?);
        config.registry.host = registry_host.clone();
        config.registry.port = port_arg("REGISTRY_PORT", registry_port)?;
        if let Some(interval) = interval {
            config.poll.interval_secs = secs_arg("INTERVAL", interval)?;
        }
        config.targets = vec![TargetConfig::from(&target)];
        Ok(())
    }

    fn apply_fan_out(&self, config: &mut MonitorConfig) -> Result<(), CliError> {
        let [registry_host, registry_port, triples @ ..] = self.args.as_slice() else {
            return Err(CliError::Usage(
                "--all needs REGISTRY_HOST REGISTRY_PORT and at least one ID:HOST:PORT".to_string(),
            ));
        };
        if triples.is_empty() {
            return Err(CliError::Usage("--all needs at least one ID:HOST:PORT".to_string()));
        }

        config.registry.host = registry_host.clone();
        config.registry.port = port_arg("REGISTRY_PORT", registry_port)?;
        config.targets = triples
            .iter()
            .map(|raw| raw.parse::<Target>().map(|t| TargetConfig::from(&t)))
            .collect::<Result<_, _>>()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(args: &[&str]) -> Result<MonitorConfig, CliError> {
        let argv = std::iter::once("heartbeat").chain(args.iter().copied());
        Cli::try_parse_from(argv).expect("clap parse").resolve()
    }

    #[test]
    fn single_target_invocation() {
        let config = resolve(&["svc1", "10.0.0.5", "8000", "redis.local", "6379"]).unwrap();
        assert_eq!(config.targets.len(), 1);
        assert_eq!(config.targets[0].id, "svc1");
        assert_eq!(config.targets[0].port, 8000);
        assert_eq!(config.registry.host, "redis.local");
        assert_eq!(config.registry.port, 6379);
        assert_eq!(config.poll.interval_secs, 30);
        assert_eq!(config.probe.timeout_secs, 10);
        assert_eq!(config.registry.backend, RegistryBackend::Redis);
    }

    #[test]
    fn single_target_interval_override() {
        let config = resolve(&["svc1", "h", "8000", "r", "6379", "5"]).unwrap();
        assert_eq!(config.poll.interval_secs, 5);

        let config = resolve(&["--interval", "7", "svc1", "h", "8000", "r", "6379", "5"]).unwrap();
        assert_eq!(config.poll.interval_secs, 7);
    }

    #[test]
    fn fan_out_invocation_keeps_order() {
        let config = resolve(&["--all", "r", "6379", "b:h1:8000", "a:h2:8001"]).unwrap();
        let ids: Vec<&str> = config.targets.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(config.targets[1].host, "h2");
        assert_eq!(config.registry.host, "r");
    }

    #[test]
    fn dry_run_and_metrics_flags() {
        let config = resolve(&["--dry-run", "--metrics-address", "127.0.0.1:9100", "s", "h", "80", "r", "6379"]).unwrap();
        assert_eq!(config.registry.backend, RegistryBackend::Memory);
        assert!(config.observability.metrics_enabled);
        assert_eq!(config.observability.metrics_address, "127.0.0.1:9100");
    }

    #[test]
    fn malformed_invocations_fail() {
        assert!(matches!(resolve(&[]), Err(CliError::Usage(_))));
        assert!(matches!(resolve(&["svc1", "h", "8000", "r"]), Err(CliError::Usage(_))));
        assert!(matches!(resolve(&["svc1", "h", "8000", "r", "6379", "5", "x"]), Err(CliError::Usage(_))));
        assert!(matches!(resolve(&["svc1", "h", "port", "r", "6379"]), Err(CliError::Number { name: "PORT", .. })));
        assert!(matches!(resolve(&["svc1", "h", "80", "r", "6379", "soon"]), Err(CliError::Number { name: "INTERVAL", .. })));
        assert!(matches!(resolve(&["svc1", "h", "80", "r", "6379", "0"]), Err(CliError::Config(_))));
        assert!(matches!(resolve(&["--all", "r", "6379"]), Err(CliError::Usage(_))));
        assert!(matches!(resolve(&["--all", "r"]), Err(CliError::Usage(_))));
        assert!(matches!(resolve(&["--all", "r", "6379", "a:h"]), Err(CliError::Target(_))));
        assert!(matches!(resolve(&["--all", "r", "6379", "a:h:1", "a:h:2"]), Err(CliError::Config(_))));
        assert!(matches!(
            resolve(&["--metrics-address", "nonsense", "svc1", "h", "80", "r", "6379"]),
            Err(CliError::Config(_))
        ));
    }
}
