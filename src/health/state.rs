//! Target health state machine.
//!
//! # States
//! - Never observed: no probe has completed for the target yet
//! - Healthy: last probe succeeded
//! - Unhealthy: last probe failed for any reason
//!
//! # State Transitions
//! ```text
//! (never observed) → Healthy | Unhealthy      first probe, always reported
//! Healthy ⇄ Unhealthy                          reported
//! Healthy → Healthy, Unhealthy → Unhealthy     recorded, not reported
//! ```
//!
//! # Design Decisions
//! - No hysteresis: one probe decides the status
//! - One independent record per target id
//! - Memory only; the registry is the durable copy

use std::collections::HashMap;
use std::fmt;

/// Binary health classification published to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    /// Wire form used in notices and the registry.
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Unhealthy => "unhealthy",
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

impl From<bool> for HealthStatus {
    fn from(healthy: bool) -> Self {
        if healthy {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of recording one probe result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    /// True when the new status differs from the previous one (or there was none).
    pub changed: bool,
    /// Status recorded before this observation; `None` on first sight.
    pub previous: Option<HealthStatus>,
}

/// Last observed status per target id.
#[derive(Debug, Default)]
pub struct StatusTracker {
    last: HashMap<String, HealthStatus>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `status` for `id` and report whether it is a transition.
    ///
    /// The stored value is overwritten on every call.
    pub fn observe(&mut self, id: &str, status: HealthStatus) -> Observation {
        let previous = self.last.insert(id.to_string(), status);
        Observation {
            changed: previous != Some(status),
            previous,
        }
    }

    /// Last recorded status for `id`, if it has ever been observed.
    pub fn last(&self, id: &str) -> Option<HealthStatus> {
        self.last.get(id).copied()
    }

    /// Number of targets observed at least once.
    pub fn len(&self) -> usize {
        self.last.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_empty()
    }
}
