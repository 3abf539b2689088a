//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Poll loop produces:
//!     → logging.rs (transition notices, registry failures)
//!     → metrics.rs (per-target gauges and counters)
//!
//! Consumers:
//!     → stderr (operators, process supervisors)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```

pub mod logging;
pub mod metrics;
