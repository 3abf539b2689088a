//! Service heartbeat monitor.
//!
//! # Architecture Overview
//!
//! ```text
//!    ┌──────────────────────────────────────────────────────────┐
//!    │                        HEARTBEAT                          │
//!    │                                                           │
//!    │  ┌─────────┐   ┌──────────┐   ┌──────────────┐            │        ┌──────────┐
//!    │  │  poll   │──▶│  probe   │───┼──────────────┼── GET ────▶│        │ service  │
//!    │  │  loop   │   └──────────┘   │              │            │        │ /health  │
//!    │  │         │   ┌──────────┐   │              │            │        └──────────┘
//!    │  │         │──▶│ tracker  │──▶│ notices      │──▶ stderr  │
//!    │  │         │   └──────────┘   └──────────────┘            │        ┌──────────┐
//!    │  │         │────────────── update_health ─────────────────┼───────▶│ registry │
//!    │  └─────────┘                                              │        └──────────┘
//!    │       ▲                                                   │
//!    │       │ shutdown (SIGINT/SIGTERM)                         │
//!    └───────┴───────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use heartbeat::cli::{Cli, USAGE};
use heartbeat::config::{MonitorConfig, RegistryBackend};
use heartbeat::lifecycle::{spawn_signal_handler, Shutdown};
use heartbeat::observability::{logging, metrics};
use heartbeat::registry::{MemoryRegistry, RedisRegistry, Registry};
use heartbeat::{HttpProbe, PollLoop};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("Usage: {}", USAGE);
            return Ok(ExitCode::FAILURE);
        }
    };

    logging::init_logging(&config.observability.log_level);

    tracing::info!(
        targets = config.targets.len(),
        interval_secs = config.poll.interval_secs,
        timeout_secs = config.probe.timeout_secs,
        registry = %format!("{}:{}", config.registry.host, config.registry.port),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let registry = build_registry(&config)?;
    let probe = Arc::new(HttpProbe::new(&config.probe));

    let shutdown = Shutdown::new();
    spawn_signal_handler(shutdown.clone());

    let poll = PollLoop::new(
        config.targets(),
        probe,
        registry,
        Duration::from_secs(config.poll.interval_secs),
    );
    poll.run(shutdown.subscribe()).await;

    tracing::info!("Shutdown complete");
    Ok(ExitCode::SUCCESS)
}

fn build_registry(config: &MonitorConfig) -> Result<Arc<dyn Registry>, Box<dyn std::error::Error>> {
    match config.registry.backend {
        RegistryBackend::Redis => {
            let registry = RedisRegistry::new(&config.registry)?;
            tracing::info!(url = %registry.url(), "Publishing to registry");
            Ok(Arc::new(registry))
        }
        RegistryBackend::Memory => {
            tracing::info!("Dry run: keeping status in memory");
            Ok(Arc::new(MemoryRegistry::new()))
        }
    }
}
