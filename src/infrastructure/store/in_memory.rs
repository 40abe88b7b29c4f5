//! In-memory store implementation

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use crate::domain::bandit::CounterKey;
use crate::domain::store::{CounterStore, KeyValueStore};
use crate::domain::DomainError;

/// Process-local store backing both counter sets and definition hashes
///
/// Each operation holds a single lock for its whole effect, which gives the
/// same per-key atomicity a remote store provides.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    sets: RwLock<HashMap<String, HashSet<String>>>,
    hashes: RwLock<HashMap<String, HashMap<String, String>>>,
}

impl InMemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for InMemoryStore {
    async fn add_member(&self, key: &CounterKey, member: &str) -> Result<bool, DomainError> {
        let mut sets = self
            .sets
            .write()
            .map_err(|e| DomainError::internal(format!("Failed to acquire write lock: {}", e)))?;

        Ok(sets
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string()))
    }

    async fn cardinality(&self, key: &CounterKey) -> Result<u64, DomainError> {
        let sets = self
            .sets
            .read()
            .map_err(|e| DomainError::internal(format!("Failed to acquire read lock: {}", e)))?;

        Ok(sets
            .get(&key.to_string())
            .map(|members| members.len() as u64)
            .unwrap_or(0))
    }

    async fn is_member(&self, key: &CounterKey, member: &str) -> Result<bool, DomainError> {
        let sets = self
            .sets
            .read()
            .map_err(|e| DomainError::internal(format!("Failed to acquire read lock: {}", e)))?;

        Ok(sets
            .get(&key.to_string())
            .is_some_and(|members| members.contains(member)))
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn put_if_absent(
        &self,
        key: &str,
        field: &str,
        value: &str,
    ) -> Result<bool, DomainError> {
        let mut hashes = self
            .hashes
            .write()
            .map_err(|e| DomainError::internal(format!("Failed to acquire write lock: {}", e)))?;

        let hash = hashes.entry(key.to_string()).or_default();

        if hash.contains_key(field) {
            return Ok(false);
        }

        hash.insert(field.to_string(), value.to_string());
        Ok(true)
    }

    async fn get(&self, key: &str, field: &str) -> Result<Option<String>, DomainError> {
        let hashes = self
            .hashes
            .read()
            .map_err(|e| DomainError::internal(format!("Failed to acquire read lock: {}", e)))?;

        Ok(hashes.get(key).and_then(|hash| hash.get(field)).cloned())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::experiment::ExperimentId;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_cardinality_of_unwritten_set_is_zero() {
        let store = InMemoryStore::new();
        let key = CounterKey::sample(ExperimentId::generate(), 0);

        assert_eq!(store.cardinality(&key).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_add_member_is_idempotent() {
        let store = InMemoryStore::new();
        let key = CounterKey::success(ExperimentId::generate(), 1);

        assert!(store.add_member(&key, "session-a").await.unwrap());
        assert!(!store.add_member(&key, "session-a").await.unwrap());
        assert!(store.add_member(&key, "session-b").await.unwrap());

        assert_eq!(store.cardinality(&key).await.unwrap(), 2);
        assert!(store.is_member(&key, "session-a").await.unwrap());
        assert!(!store.is_member(&key, "session-c").await.unwrap());
    }

    #[tokio::test]
    async fn test_counters_are_keyed_by_kind_and_arm() {
        let store = InMemoryStore::new();
        let id = ExperimentId::generate();

        store.add_member(&CounterKey::sample(id, 0), "s").await.unwrap();

        assert_eq!(store.cardinality(&CounterKey::success(id, 0)).await.unwrap(), 0);
        assert_eq!(store.cardinality(&CounterKey::sample(id, 1)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_adds_count_distinct_sessions() {
        let store = Arc::new(InMemoryStore::new());
        let key = CounterKey::sample(ExperimentId::generate(), 0);
        let mut handles = Vec::new();

        for i in 0..50 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.add_member(&key, &format!("session-{}", i % 10)).await
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.cardinality(&key).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_put_if_absent() {
        let store = InMemoryStore::new();

        assert!(store.put_if_absent("experiments:1", "abc", "{}").await.unwrap());
        assert!(!store.put_if_absent("experiments:1", "abc", "[]").await.unwrap());

        assert_eq!(
            store.get("experiments:1", "abc").await.unwrap(),
            Some("{}".to_string())
        );
        assert!(store.get("experiments:1", "xyz").await.unwrap().is_none());
        assert!(store.get("experiments:2", "abc").await.unwrap().is_none());
    }
}
