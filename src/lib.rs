//! Service heartbeat monitor library.
//!
//! Probes HTTP health endpoints on a fixed interval and publishes each
//! target's status to a shared registry.

pub mod cli;
pub mod config;
pub mod health;
pub mod lifecycle;
pub mod monitor;
pub mod observability;
pub mod registry;

pub use config::MonitorConfig;
pub use health::{HealthStatus, HttpProbe, Probe, StatusTracker};
pub use lifecycle::Shutdown;
pub use monitor::{PollLoop, Target};
pub use registry::{MemoryRegistry, RedisRegistry, Registry};
