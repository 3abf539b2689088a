//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid)
//! - Detect duplicate target ids
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MonitorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;
use std::str::FromStr;

use tracing::level_filters::LevelFilter;

use thiserror::Error;

use crate::config::schema::MonitorConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field} must not be empty")]
    Empty { field: String },

    #[error("probe.path must start with '/', got '{0}'")]
    RelativePath(String),

    #[error("target id '{0}' must not contain ':'")]
    IdSeparator(String),

    #[error("duplicate target id '{0}'")]
    DuplicateId(String),

    #[error("unknown observability.log_level '{0}'")]
    LogLevel(String),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.probe.timeout_secs == 0 {
        errors.push(ValidationError::Zero { field: "probe.timeout_secs" });
    }
    if config.probe.path.is_empty() {
        errors.push(ValidationError::Empty { field: "probe.path".to_string() });
    } else if !config.probe.path.starts_with('/') {
        errors.push(ValidationError::RelativePath(config.probe.path.clone()));
    }
    if config.poll.interval_secs == 0 {
        errors.push(ValidationError::Zero { field: "poll.interval_secs" });
    }

    if config.registry.host.is_empty() {
        errors.push(ValidationError::Empty { field: "registry.host".to_string() });
    }
    if config.registry.port == 0 {
        errors.push(ValidationError::Zero { field: "registry.port" });
    }
    if config.registry.key_prefix.is_empty() {
        errors.push(ValidationError::Empty { field: "registry.key_prefix".to_string() });
    }

    if LevelFilter::from_str(&config.observability.log_level).is_err() {
        errors.push(ValidationError::LogLevel(config.observability.log_level.clone()));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(config.observability.metrics_address.clone()));
    }

    let mut seen = HashSet::new();
    for (i, target) in config.targets.iter().enumerate() {
        if target.id.is_empty() {
            errors.push(ValidationError::Empty { field: format!("targets[{}].id", i) });
        } else if target.id.contains(':') {
            errors.push(ValidationError::IdSeparator(target.id.clone()));
        } else if !seen.insert(target.id.as_str()) {
            errors.push(ValidationError::DuplicateId(target.id.clone()));
        }
        if target.host.is_empty() {
            errors.push(ValidationError::Empty { field: format!("targets[{}].host", i) });
        }
        if target.port == 0 {
            errors.push(ValidationError::Zero { field: "targets.port" });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
