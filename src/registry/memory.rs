//! In-process registry.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::health::HealthStatus;
use crate::registry::{Registry, RegistryError};

#[derive(Debug, Default)]
struct Inner {
    current: HashMap<String, HealthStatus>,
    history: Vec<(String, HealthStatus)>,
}

/// Registry that keeps every publish in memory.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    inner: Mutex<Inner>,
    failing: AtomicBool,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent publishes fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Current status of `target_id`, if ever published.
    pub fn status(&self, target_id: &str) -> Option<HealthStatus> {
        self.lock().current.get(target_id).copied()
    }

    /// Every successful publish, in order.
    pub fn history(&self) -> Vec<(String, HealthStatus)> {
        self.lock().history.clone()
    }

    /// Successful publishes for one target, in order.
    pub fn history_for(&self, target_id: &str) -> Vec<HealthStatus> {
        self.lock()
            .history
            .iter()
            .filter(|(id, _)| id == target_id)
            .map(|(_, status)| *status)
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Registry for MemoryRegistry {
    async fn update_health(&self, target_id: &str, status: HealthStatus) -> Result<(), RegistryError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RegistryError::Connection("memory registry set to fail".to_string()));
        }

        let mut inner = self.lock();
        inner.current.insert(target_id.to_string(), status);
        inner.history.push((target_id.to_string(), status));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_current_and_history() {
        let registry = MemoryRegistry::new();
        registry.update_health("a", HealthStatus::Healthy).await.unwrap();
        registry.update_health("a", HealthStatus::Healthy).await.unwrap();
        registry.update_health("b", HealthStatus::Unhealthy).await.unwrap();

        assert_eq!(registry.status("a"), Some(HealthStatus::Healthy));
        assert_eq!(registry.status("b"), Some(HealthStatus::Unhealthy));
        assert_eq!(registry.history().len(), 3);
        assert_eq!(registry.history_for("a"), vec![HealthStatus::Healthy, HealthStatus::Healthy]);
    }

    #[tokio::test]
    async fn failing_mode_rejects_writes() {
        let registry = MemoryRegistry::new();
        registry.set_failing(true);
        assert!(registry.update_health("a", HealthStatus::Healthy).await.is_err());
        assert_eq!(registry.status("a"), None);

        registry.set_failing(false);
        registry.update_health("a", HealthStatus::Healthy).await.unwrap();
        assert_eq!(registry.status("a"), Some(HealthStatus::Healthy));
    }
}
