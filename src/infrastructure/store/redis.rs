//! Redis store implementation

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{AsyncCommands, Client};
use tracing::info;

use crate::domain::bandit::CounterKey;
use crate::domain::store::{CounterStore, KeyValueStore};
use crate::domain::DomainError;

/// Configuration for the Redis store
#[derive(Debug, Clone)]
pub struct RedisStoreConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
    /// Key prefix for namespacing
    pub key_prefix: Option<String>,
    /// Connection timeout
    pub connection_timeout: Duration,
}

impl Default for RedisStoreConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            key_prefix: None,
            connection_timeout: Duration::from_secs(5),
        }
    }
}

impl RedisStoreConfig {
    /// Creates a new configuration with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Sets the key prefix
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Sets the connection timeout
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }
}

/// Redis-backed store
///
/// Counters map to Redis sets (`SADD`/`SCARD`/`SISMEMBER`) and experiment
/// definitions to hash fields (`HSETNX`/`HGET`), so every operation is a
/// single atomic command.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
    config: RedisStoreConfig,
}

impl fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStore")
            .field("config", &self.config)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisStore {
    /// Connect to Redis
    pub async fn new(config: RedisStoreConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str()).map_err(|e| {
            DomainError::configuration(format!("Failed to create Redis client: {}", e))
        })?;

        let manager_config =
            ConnectionManagerConfig::new().set_connection_timeout(config.connection_timeout);

        let connection = ConnectionManager::new_with_config(client, manager_config)
            .await
            .map_err(|e| DomainError::store_unavailable(format!("Failed to connect to Redis: {}", e)))?;

        info!(url = %config.url, "Redis connection established");

        Ok(Self { connection, config })
    }

    /// Connect with default configuration
    pub async fn with_url(url: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(RedisStoreConfig::new(url)).await
    }

    fn prefix_key(&self, key: &str) -> String {
        match &self.config.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }
}

#[async_trait]
impl CounterStore for RedisStore {
    async fn add_member(&self, key: &CounterKey, member: &str) -> Result<bool, DomainError> {
        let prefixed_key = self.prefix_key(&key.to_string());
        let mut conn = self.connection.clone();

        let added: i64 = conn.sadd(&prefixed_key, member).await.map_err(|e| {
            DomainError::store_unavailable(format!("Failed to add member to '{}': {}", key, e))
        })?;

        Ok(added > 0)
    }

    async fn cardinality(&self, key: &CounterKey) -> Result<u64, DomainError> {
        let prefixed_key = self.prefix_key(&key.to_string());
        let mut conn = self.connection.clone();

        let count: u64 = conn.scard(&prefixed_key).await.map_err(|e| {
            DomainError::store_unavailable(format!("Failed to count members of '{}': {}", key, e))
        })?;

        Ok(count)
    }

    async fn is_member(&self, key: &CounterKey, member: &str) -> Result<bool, DomainError> {
        let prefixed_key = self.prefix_key(&key.to_string());
        let mut conn = self.connection.clone();

        let present: bool = conn.sismember(&prefixed_key, member).await.map_err(|e| {
            DomainError::store_unavailable(format!("Failed to check membership of '{}': {}", key, e))
        })?;

        Ok(present)
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn put_if_absent(
        &self,
        key: &str,
        field: &str,
        value: &str,
    ) -> Result<bool, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let created: bool = conn
            .hset_nx(&prefixed_key, field, value)
            .await
            .map_err(|e| {
                DomainError::store_unavailable(format!(
                    "Failed to set field '{}' on '{}': {}",
                    field, key, e
                ))
            })?;

        Ok(created)
    }

    async fn get(&self, key: &str, field: &str) -> Result<Option<String>, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let value: Option<String> = conn.hget(&prefixed_key, field).await.map_err(|e| {
            DomainError::store_unavailable(format!(
                "Failed to get field '{}' on '{}': {}",
                field, key, e
            ))
        })?;

        Ok(value)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        let mut conn = self.connection.clone();

        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map_err(|e| DomainError::store_unavailable(format!("Redis ping failed: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::experiment::ExperimentId;

    // Note: these tests require a running Redis instance
    // Run with: cargo test -- --ignored

    fn get_test_config() -> RedisStoreConfig {
        RedisStoreConfig::new("redis://127.0.0.1:6379").with_key_prefix("bandit-test")
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_counter_set() {
        let store = RedisStore::new(get_test_config()).await.unwrap();
        let key = CounterKey::sample(ExperimentId::generate(), 0);

        assert!(store.add_member(&key, "session-a").await.unwrap());
        assert!(!store.add_member(&key, "session-a").await.unwrap());
        assert!(store.add_member(&key, "session-b").await.unwrap());

        assert_eq!(store.cardinality(&key).await.unwrap(), 2);
        assert!(store.is_member(&key, "session-b").await.unwrap());
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_put_if_absent() {
        let store = RedisStore::new(get_test_config()).await.unwrap();
        let field = ExperimentId::generate().to_string();

        assert!(store.put_if_absent("experiments:0", &field, "{}").await.unwrap());
        assert!(!store.put_if_absent("experiments:0", &field, "{}").await.unwrap());
        assert_eq!(
            store.get("experiments:0", &field).await.unwrap(),
            Some("{}".to_string())
        );
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_ping() {
        let store = RedisStore::new(get_test_config()).await.unwrap();
        assert!(store.ping().await.is_ok());
    }

    #[test]
    fn test_key_prefix_config() {
        let config = RedisStoreConfig::new("redis://localhost")
            .with_key_prefix("bandit")
            .with_connection_timeout(Duration::from_secs(1));

        assert_eq!(config.key_prefix, Some("bandit".to_string()));
        assert_eq!(config.connection_timeout, Duration::from_secs(1));
    }
}
