//! Metrics collection and exposition.
//!
//! # Metrics
//! - `heartbeat_target_health` (gauge): 1=healthy, 0=unhealthy, per target
//! - `heartbeat_probes_total` (counter): probes by target and status
//! - `heartbeat_transitions_total` (counter): status changes per target
//! - `heartbeat_registry_errors_total` (counter): failed publishes per target
//! - `heartbeat_cycle_duration_seconds` (histogram): wall time of one cycle
//!
//! Recording is a no-op until a recorder is installed.

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::health::HealthStatus;

/// Install the Prometheus recorder with an HTTP scrape endpoint at `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_probe(target_id: &str, status: HealthStatus) {
    let value = if status.is_healthy() { 1.0 } else { 0.0 };
    gauge!("heartbeat_target_health", "target" => target_id.to_string()).set(value);
    counter!(
        "heartbeat_probes_total",
        "target" => target_id.to_string(),
        "status" => status.as_str()
    )
    .increment(1);
}

pub fn record_transition(target_id: &str) {
    counter!("heartbeat_transitions_total", "target" => target_id.to_string()).increment(1);
}

pub fn record_registry_error(target_id: &str) {
    counter!("heartbeat_registry_errors_total", "target" => target_id.to_string()).increment(1);
}

pub fn record_cycle(duration: Duration) {
    histogram!("heartbeat_cycle_duration_seconds").record(duration.as_secs_f64());
}
