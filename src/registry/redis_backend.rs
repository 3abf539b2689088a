//! Redis/Valkey-backed health registry.
//!
//! Each target is stored as a hash:
//! ```text
//! HSET <key_prefix>:<target_id> status <healthy|unhealthy> updated_at <unix secs>
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::config::RegistryConfig;
use crate::health::HealthStatus;
use crate::registry::{Registry, RegistryError};

pub struct RedisRegistry {
    client: redis::Client,
    url: String,
    key_prefix: String,
    connection: Mutex<Option<redis::aio::MultiplexedConnection>>,
}

impl RedisRegistry {
    /// Build a client for the registry at `config.host:config.port`.
    ///
    /// No connection is opened until the first publish.
    pub fn new(config: &RegistryConfig) -> Result<Self, RegistryError> {
        let url = format!("redis://{}:{}/", config.host, config.port);
        let client = redis::Client::open(url.as_str())
            .map_err(|e| RegistryError::Connection(format!("invalid registry address {}: {}", url, e)))?;

        Ok(Self {
            client,
            url,
            key_prefix: config.key_prefix.clone(),
            connection: Mutex::new(None),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Hash key holding `target_id`'s status.
    pub fn key_for(&self, target_id: &str) -> String {
        format!("{}:{}", self.key_prefix, target_id)
    }

    fn now_unix_secs() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

#[async_trait]
impl Registry for RedisRegistry {
    async fn update_health(&self, target_id: &str, status: HealthStatus) -> Result<(), RegistryError> {
        let mut guard = self.connection.lock().await;

        if guard.is_none() {
            let conn = self
                .client
                .get_multiplexed_async_connection()
                .await
                .map_err(|e| RegistryError::Connection(format!("{}: {}", self.url, e)))?;
            tracing::debug!(url = %self.url, "Registry connection established");
            *guard = Some(conn);
        }

        let Some(conn) = guard.as_mut() else {
            return Err(RegistryError::Connection(format!("{}: connection unavailable", self.url)));
        };

        let mut cmd = redis::cmd("HSET");
        cmd.arg(self.key_for(target_id))
            .arg("status")
            .arg(status.as_str())
            .arg("updated_at")
            .arg(Self::now_unix_secs());

        let result: redis::RedisResult<i64> = cmd.query_async(conn).await;
        if let Err(e) = result {
            // Reconnect on the next publish.
            *guard = None;
            return Err(RegistryError::Command(e.to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(port: u16) -> RegistryConfig {
        RegistryConfig {
            host: "127.0.0.1".to_string(),
            port,
            key_prefix: "heartbeat:service".to_string(),
            ..RegistryConfig::default()
        }
    }

    #[test]
    fn builds_url_and_keys_without_connecting() {
        let registry = RedisRegistry::new(&config(6380)).unwrap();
        assert_eq!(registry.url(), "redis://127.0.0.1:6380/");
        assert_eq!(registry.key_for("svc1"), "heartbeat:service:svc1");
    }

    #[tokio::test]
    async fn unreachable_registry_returns_connection_error() {
        // Bind then drop to get a port nobody listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let registry = RedisRegistry::new(&config(port)).unwrap();
        let err = registry
            .update_health("svc1", HealthStatus::Healthy)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Connection(_)));
    }
}
