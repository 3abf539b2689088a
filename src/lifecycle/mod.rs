//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Parse args → Load config → Validate → Build probe + registry → Run loop
//!
//! Shutdown (shutdown.rs):
//!     Trigger → poll loop stops at its next check point → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger shutdown; second signal → exit(130)
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, before the first probe
//! - A cycle in progress runs to completion before the loop notices

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownListener};
pub use signals::{escalate, spawn_signal_handler, FORCED_EXIT_CODE};
