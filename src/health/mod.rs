//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Probe (probe.rs):
//!     HTTP GET /health with deadline
//!     → 2xx within deadline: Healthy
//!     → anything else: Unhealthy
//!
//! Status tracking (state.rs):
//!     Probe result per target id
//!     → overwrite last status
//!     → report whether it changed
//! ```
//!
//! # Design Decisions
//! - Binary status only; no Unknown is ever published
//! - Probes never return errors
//! - Health state is per-target, keyed by id

pub mod probe;
pub mod state;

pub use probe::{HttpProbe, Probe};
pub use state::{HealthStatus, Observation, StatusTracker};
