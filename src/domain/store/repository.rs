//! Store capabilities consumed by the core

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::bandit::CounterKey;
use crate::domain::DomainError;

/// Set-valued counters of session identities
///
/// Every operation must be atomic at the store level; callers never lock.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Idempotently add a member, returning whether it was new
    async fn add_member(&self, key: &CounterKey, member: &str) -> Result<bool, DomainError>;

    /// Number of distinct members; zero for a set never written
    async fn cardinality(&self, key: &CounterKey) -> Result<u64, DomainError>;

    /// Whether `member` is in the set
    async fn is_member(&self, key: &CounterKey, member: &str) -> Result<bool, DomainError>;
}

/// Hash-shaped key/value storage used for experiment definitions
#[cfg_attr(test, automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Atomically set `field` under `key` unless it already exists
    ///
    /// Returns `false` when the field was already present.
    async fn put_if_absent(&self, key: &str, field: &str, value: &str)
    -> Result<bool, DomainError>;

    /// Read `field` under `key`
    async fn get(&self, key: &str, field: &str) -> Result<Option<String>, DomainError>;

    /// Round-trip to the backend
    async fn ping(&self) -> Result<(), DomainError>;
}
