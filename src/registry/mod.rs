//! Health registry clients.
//!
//! The registry is the durable, externally visible store of per-target
//! health. This process only writes to it.
//!
//! # Backends
//! - `redis_backend.rs`: hash per target in Redis/Valkey
//! - `memory.rs`: in-process record, used for dry runs and tests
//!
//! # Design Decisions
//! - `update_health` is idempotent; callers publish every cycle
//! - Errors are returned, never retried here

pub mod memory;
pub mod redis_backend;

use async_trait::async_trait;
use thiserror::Error;

use crate::health::HealthStatus;

pub use self::memory::MemoryRegistry;
pub use self::redis_backend::RedisRegistry;

/// Errors returned by registry backends.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Could not reach the registry.
    #[error("registry connection failed: {0}")]
    Connection(String),

    /// The registry rejected or failed the write.
    #[error("registry command failed: {0}")]
    Command(String),
}

/// Sink for published health status.
#[async_trait]
pub trait Registry: Send + Sync {
    /// Set the current health of `target_id`.
    async fn update_health(&self, target_id: &str, status: HealthStatus) -> Result<(), RegistryError>;
}
