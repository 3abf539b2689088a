//! The poll loop.
//!
//! # Responsibilities
//! - Probe every target once per cycle, in configured order
//! - Feed results through the status tracker and log transitions
//! - Publish every result to the registry, changed or not
//! - Sleep between cycles until shutdown
//!
//! # Design Decisions
//! - Targets are probed sequentially; cycle time grows with target count
//! - Registry failures are logged and counted, never retried or fatal
//! - Shutdown is checked before each cycle and raced against the sleep

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time;

use crate::health::{HealthStatus, Probe, StatusTracker};
use crate::lifecycle::ShutdownListener;
use crate::monitor::Target;
use crate::observability::metrics;
use crate::registry::Registry;

/// A status change for one target, as written to the diagnostic stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionNotice {
    pub target_id: String,
    /// `None` on the first observation.
    pub previous: Option<HealthStatus>,
    pub current: HealthStatus,
}

impl fmt::Display for TransitionNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let previous = self.previous.map(|s| s.as_str()).unwrap_or("init");
        write!(f, "{}: {} -> {}", self.target_id, previous, self.current)
    }
}

/// What one cycle did.
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    /// Probe result per target, in probe order.
    pub statuses: Vec<(String, HealthStatus)>,
    /// Transitions, in probe order.
    pub notices: Vec<TransitionNotice>,
    /// Targets whose publish failed this cycle.
    pub registry_failures: Vec<String>,
}

pub struct PollLoop {
    targets: Vec<Target>,
    probe: Arc<dyn Probe>,
    registry: Arc<dyn Registry>,
    tracker: StatusTracker,
    interval: Duration,
    cycles: u64,
}

impl PollLoop {
    pub fn new(
        targets: Vec<Target>,
        probe: Arc<dyn Probe>,
        registry: Arc<dyn Registry>,
        interval: Duration,
    ) -> Self {
        Self {
            targets,
            probe,
            registry,
            tracker: StatusTracker::new(),
            interval,
            cycles: 0,
        }
    }

    /// Loop over exactly one target.
    pub fn single(
        target: Target,
        probe: Arc<dyn Probe>,
        registry: Arc<dyn Registry>,
        interval: Duration,
    ) -> Self {
        Self::new(vec![target], probe, registry, interval)
    }

    pub fn tracker(&self) -> &StatusTracker {
        &self.tracker
    }

    /// Completed cycles so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Probe, track and publish every target once.
    pub async fn run_cycle(&mut self) -> CycleReport {
        let started = Instant::now();
        let mut report = CycleReport::default();

        for target in &self.targets {
            let status = self.probe.check(target).await;
            metrics::record_probe(target.id(), status);

            let observation = self.tracker.observe(target.id(), status);
            if observation.changed {
                let notice = TransitionNotice {
                    target_id: target.id().to_string(),
                    previous: observation.previous,
                    current: status,
                };
                tracing::info!("[heartbeat] {}", notice);
                metrics::record_transition(target.id());
                report.notices.push(notice);
            }

            if let Err(e) = self.registry.update_health(target.id(), status).await {
                tracing::warn!(target_id = %target.id(), status = %status, error = %e, "Registry update failed");
                metrics::record_registry_error(target.id());
                report.registry_failures.push(target.id().to_string());
            }

            report.statuses.push((target.id().to_string(), status));
        }

        self.cycles += 1;
        metrics::record_cycle(started.elapsed());
        report
    }

    /// Run cycles until `shutdown` fires. Returns the number of completed cycles.
    pub async fn run(mut self, mut shutdown: ShutdownListener) -> u64 {
        tracing::info!(
            targets = self.targets.len(),
            interval_secs = self.interval.as_secs(),
            "Heartbeat monitor starting"
        );

        loop {
            if shutdown.is_triggered() {
                break;
            }

            self.run_cycle().await;

            tokio::select! {
                _ = time::sleep(self.interval) => {}
                _ = shutdown.recv() => break,
            }
        }

        tracing::info!(cycles = self.cycles, "Heartbeat monitor stopped");
        self.cycles
    }
}
