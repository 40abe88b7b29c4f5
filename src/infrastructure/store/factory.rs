//! Store factory for runtime backend selection

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::domain::store::{CounterStore, KeyValueStore};
use crate::domain::DomainError;

use super::in_memory::InMemoryStore;
use super::redis::{RedisStore, RedisStoreConfig};

/// Supported store backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreType {
    /// Process-local maps
    #[default]
    InMemory,
    /// Redis sets and hashes
    Redis,
}

impl std::fmt::Display for StoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreType::InMemory => write!(f, "in_memory"),
            StoreType::Redis => write!(f, "redis"),
        }
    }
}

impl std::str::FromStr for StoreType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in_memory" | "inmemory" | "memory" => Ok(StoreType::InMemory),
            "redis" => Ok(StoreType::Redis),
            _ => Err(DomainError::configuration(format!(
                "Unknown store backend: {}. Valid backends: in_memory, redis",
                s
            ))),
        }
    }
}

/// Resolved settings for building a store
#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub store_type: StoreType,
    pub redis_url: Option<String>,
    pub key_prefix: Option<String>,
    pub connection_timeout: Duration,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            store_type: StoreType::InMemory,
            redis_url: None,
            key_prefix: None,
            connection_timeout: Duration::from_secs(5),
        }
    }
}

impl StoreSettings {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn redis(url: impl Into<String>) -> Self {
        Self {
            store_type: StoreType::Redis,
            redis_url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }
}

/// Both store capabilities, usually served by one backend
#[derive(Clone)]
pub struct StoreHandles {
    pub definitions: Arc<dyn KeyValueStore>,
    pub counters: Arc<dyn CounterStore>,
}

impl StoreHandles {
    /// Use one backend for both capabilities
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: KeyValueStore + CounterStore + 'static,
    {
        Self {
            definitions: store.clone(),
            counters: store,
        }
    }
}

/// Factory for creating store backends
pub struct StoreFactory;

impl StoreFactory {
    /// Create the configured backend
    pub async fn create(settings: &StoreSettings) -> Result<StoreHandles, DomainError> {
        match settings.store_type {
            StoreType::InMemory => {
                info!("Using in-memory store");
                Ok(Self::in_memory())
            }
            StoreType::Redis => {
                let url = settings.redis_url.clone().ok_or_else(|| {
                    DomainError::configuration("Redis URL is required for the redis store backend")
                })?;

                let mut config =
                    RedisStoreConfig::new(url).with_connection_timeout(settings.connection_timeout);

                if let Some(prefix) = &settings.key_prefix {
                    config = config.with_key_prefix(prefix);
                }

                let store = RedisStore::new(config).await?;
                Ok(StoreHandles::shared(Arc::new(store)))
            }
        }
    }

    /// Create a fresh in-memory backend
    pub fn in_memory() -> StoreHandles {
        StoreHandles::shared(Arc::new(InMemoryStore::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_store_type_from_str() {
        assert_eq!(StoreType::from_str("in_memory").unwrap(), StoreType::InMemory);
        assert_eq!(StoreType::from_str("memory").unwrap(), StoreType::InMemory);
        assert_eq!(StoreType::from_str("Redis").unwrap(), StoreType::Redis);
        assert!(StoreType::from_str("postgres").is_err());
    }

    #[test]
    fn test_store_type_display() {
        assert_eq!(StoreType::InMemory.to_string(), "in_memory");
        assert_eq!(StoreType::Redis.to_string(), "redis");
    }

    #[tokio::test]
    async fn test_create_in_memory() {
        let handles = StoreFactory::create(&StoreSettings::in_memory()).await.unwrap();

        assert!(handles.definitions.ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_create_redis_requires_url() {
        let settings = StoreSettings {
            store_type: StoreType::Redis,
            ..Default::default()
        };

        let result = StoreFactory::create(&settings).await;
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_shared_handles_see_same_data() {
        use crate::domain::bandit::CounterKey;
        use crate::domain::experiment::ExperimentId;

        let store = Arc::new(InMemoryStore::new());
        let handles = StoreHandles::shared(store.clone());
        let key = CounterKey::sample(ExperimentId::generate(), 0);

        handles.counters.add_member(&key, "s").await.unwrap();

        assert_eq!(store.cardinality(&key).await.unwrap(), 1);
    }
}
