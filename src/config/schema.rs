//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the monitor.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::monitor::Target;

/// Root configuration for the heartbeat monitor.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MonitorConfig {
    /// Probe settings.
    pub probe: ProbeConfig,

    /// Poll loop settings.
    pub poll: PollConfig,

    /// Registry connection settings.
    pub registry: RegistryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Endpoints to monitor, in probe order.
    pub targets: Vec<TargetConfig>,
}

impl MonitorConfig {
    /// Configured targets as runtime values, in order.
    pub fn targets(&self) -> Vec<Target> {
        self.targets
            .iter()
            .map(|t| Target::new(t.id.clone(), t.host.clone(), t.port))
            .collect()
    }
}

/// Probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Probe deadline in seconds.
    pub timeout_secs: u64,

    /// Path requested on every target.
    pub path: String,

    /// User-Agent header sent with probes.
    pub user_agent: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            path: "/health".to_string(),
            user_agent: "heartbeat-monitor".to_string(),
        }
    }
}

/// Poll loop configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PollConfig {
    /// Sleep between cycles in seconds.
    pub interval_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self { interval_secs: 30 }
    }
}

/// Which registry implementation to publish to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RegistryBackend {
    #[default]
    Redis,
    /// Keep status in process only (dry run).
    Memory,
}

/// Registry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Registry host.
    pub host: String,

    /// Registry port.
    pub port: u16,

    /// Prefix for per-target keys.
    pub key_prefix: String,

    /// Backend implementation.
    pub backend: RegistryBackend,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            key_prefix: "heartbeat:service".to_string(),
            backend: RegistryBackend::Redis,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// One monitored endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TargetConfig {
    /// Registry id.
    pub id: String,

    /// Endpoint host.
    pub host: String,

    /// Endpoint port.
    pub port: u16,
}

impl From<&Target> for TargetConfig {
    fn from(target: &Target) -> Self {
        Self {
            id: target.id().to_string(),
            host: target.host().to_string(),
            port: target.port(),
        }
    }
}
