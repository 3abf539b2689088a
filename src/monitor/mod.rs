//! Monitoring subsystem.
//!
//! # Data Flow
//! ```text
//! Every cycle, for each target in order:
//!     probe (health::probe)
//!     → status tracker (health::state)
//!     → transition notice on change (stderr)
//!     → registry.update_health (always)
//! then sleep for the interval, unless shutdown fired.
//! ```
//!
//! Single-target mode is the same loop with a one-element target list.

pub mod poll;
pub mod target;

pub use poll::{CycleReport, PollLoop, TransitionNotice};
pub use target::{parse_port, Target, TargetParseError};
