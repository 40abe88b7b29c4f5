//! Experiment registry service
//!
//! Validates definitions against the policy registry, assigns identifiers and
//! persists experiments into bucketed hashes so that no single hash grows
//! without bound.

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::domain::experiment::{Experiment, ExperimentDefinition, ExperimentId};
use crate::domain::store::KeyValueStore;
use crate::domain::DomainError;
use crate::infrastructure::bandit::PolicyRegistry;
use crate::infrastructure::observability::record_registration;

/// Default number of consecutive ids sharing one bucket
pub const DEFAULT_BUCKET_WIDTH: u128 = 1000;

const EXPERIMENTS_NAMESPACE: &str = "experiments";

/// Trait for the experiment service (for dynamic dispatch in AppState)
#[async_trait]
pub trait ExperimentServiceTrait: Send + Sync + Debug {
    /// Register a new experiment and return its identifier
    async fn register(&self, definition: ExperimentDefinition) -> Result<ExperimentId, DomainError>;

    /// Load a registered experiment
    async fn get(&self, id: &str) -> Result<Experiment, DomainError>;
}

/// Service for registering and loading experiments
pub struct ExperimentService {
    store: Arc<dyn KeyValueStore>,
    policies: Arc<PolicyRegistry>,
    bucket_width: u128,
}

impl Debug for ExperimentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExperimentService")
            .field("policies", &self.policies.len())
            .field("bucket_width", &self.bucket_width)
            .finish_non_exhaustive()
    }
}

impl ExperimentService {
    pub fn new(store: Arc<dyn KeyValueStore>, policies: Arc<PolicyRegistry>) -> Self {
        Self {
            store,
            policies,
            bucket_width: DEFAULT_BUCKET_WIDTH,
        }
    }

    pub fn with_bucket_width(mut self, width: u128) -> Self {
        self.bucket_width = width.max(1);
        self
    }

    pub fn policies(&self) -> &PolicyRegistry {
        &self.policies
    }

    fn bucket_key(&self, id: &ExperimentId) -> String {
        format!("{}:{}", EXPERIMENTS_NAMESPACE, id.bucket(self.bucket_width))
    }

    /// Register a validated definition under a freshly generated id
    #[instrument(skip(self, definition), fields(policy = %definition.policy))]
    pub async fn register(
        &self,
        definition: ExperimentDefinition,
    ) -> Result<ExperimentId, DomainError> {
        let parameters = definition.validate()?;

        let policy = self.policies.resolve(definition.policy.trim()).map_err(|e| match e {
            DomainError::UnknownPolicy { policy } => DomainError::validation(format!(
                "Unknown policy '{}'. Valid policies: {}",
                policy,
                self.policies
                    .list()
                    .iter()
                    .map(|p| p.id)
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
            other => other,
        })?;

        policy.validate_parameters(&parameters)?;

        let id = ExperimentId::generate();
        let experiment = Experiment::new(id, definition, parameters);
        let encoded = serde_json::to_string(&experiment)
            .map_err(|e| DomainError::internal(format!("Failed to encode experiment: {}", e)))?;

        let created = self
            .store
            .put_if_absent(&self.bucket_key(&id), &id.to_string(), &encoded)
            .await?;

        if !created {
            return Err(DomainError::conflict(format!(
                "Experiment '{}' already exists",
                id
            )));
        }

        record_registration(experiment.policy());
        info!(
            experiment_id = %id,
            name = %experiment.name(),
            arms = experiment.arm_count(),
            "Experiment registered"
        );

        Ok(id)
    }

    /// Load an experiment; malformed ids are reported as not found
    pub async fn get(&self, id: &str) -> Result<Experiment, DomainError> {
        let experiment_id = ExperimentId::new(id)
            .map_err(|_| DomainError::not_found(format!("Experiment '{}' not found", id)))?;

        self.get_by_id(&experiment_id).await
    }

    pub async fn get_by_id(&self, id: &ExperimentId) -> Result<Experiment, DomainError> {
        debug!(experiment_id = %id, "Loading experiment");

        let encoded = self
            .store
            .get(&self.bucket_key(id), &id.to_string())
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Experiment '{}' not found", id)))?;

        serde_json::from_str(&encoded).map_err(|e| {
            DomainError::internal(format!("Stored experiment '{}' is corrupt: {}", id, e))
        })
    }
}

#[async_trait]
impl ExperimentServiceTrait for ExperimentService {
    async fn register(&self, definition: ExperimentDefinition) -> Result<ExperimentId, DomainError> {
        ExperimentService::register(self, definition).await
    }

    async fn get(&self, id: &str) -> Result<Experiment, DomainError> {
        ExperimentService::get(self, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::store::MockKeyValueStore;
    use crate::infrastructure::store::InMemoryStore;
    use serde_json::json;

    fn create_service() -> ExperimentService {
        ExperimentService::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(PolicyRegistry::with_defaults()),
        )
    }

    fn greedy_definition() -> ExperimentDefinition {
        ExperimentDefinition::new("Homepage button", "epsilon_greedy")
            .with_arms(["A", "B", "C"])
            .with_parameters(json!({ "epsilon": 0.1 }))
    }

    #[tokio::test]
    async fn test_register_and_get() {
        let service = create_service();

        let id = service.register(greedy_definition()).await.unwrap();
        let experiment = service.get(&id.to_string()).await.unwrap();

        assert_eq!(experiment.id(), &id);
        assert_eq!(experiment.name(), "Homepage button");
        assert_eq!(experiment.policy(), "epsilon_greedy");
        assert_eq!(experiment.arms(), &["A", "B", "C"]);
        assert_eq!(experiment.parameters().get("epsilon"), Some(&json!(0.1)));
    }

    #[tokio::test]
    async fn test_register_generates_distinct_ids() {
        let service = create_service();

        let first = service.register(greedy_definition()).await.unwrap();
        let second = service.register(greedy_definition()).await.unwrap();

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_register_unknown_policy_is_validation_error() {
        let service = create_service();
        let definition = ExperimentDefinition::new("x", "thompson").with_arms(["A"]);

        let result = service.register(definition).await;

        match result {
            Err(DomainError::Validation { message }) => assert!(message.contains("thompson")),
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_register_rejects_bad_parameters() {
        let service = create_service();
        let definition = ExperimentDefinition::new("x", "epsilon_greedy")
            .with_arms(["A", "B"])
            .with_parameters(json!({ "epsilon": 2.0 }));

        let result = service.register(definition).await;
        assert!(matches!(result, Err(DomainError::InvalidParameter { .. })));
    }

    #[tokio::test]
    async fn test_register_rejects_empty_arms() {
        let service = create_service();
        let definition = ExperimentDefinition::new("x", "probability_matching");

        let result = service.register(definition).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_register_placeholder_policy() {
        let service = create_service();
        let definition = ExperimentDefinition::new("x", "pricing").with_arms(["A", "B"]);

        assert!(service.register(definition).await.is_ok());
    }

    #[tokio::test]
    async fn test_register_conflict_when_id_taken() {
        let mut store = MockKeyValueStore::new();
        store.expect_put_if_absent().returning(|_, _, _| Ok(false));

        let service =
            ExperimentService::new(Arc::new(store), Arc::new(PolicyRegistry::with_defaults()));

        let result = service.register(greedy_definition()).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_register_writes_to_bucket() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_put_if_absent()
            .withf(|key, field, _| {
                let id = ExperimentId::new(field).unwrap();
                *key == format!("experiments:{}", id.as_u128() / 1000)
            })
            .times(1)
            .returning(|_, _, _| Ok(true));

        let service =
            ExperimentService::new(Arc::new(store), Arc::new(PolicyRegistry::with_defaults()));

        service.register(greedy_definition()).await.unwrap();
    }

    #[tokio::test]
    async fn test_get_unknown_and_malformed_ids() {
        let service = create_service();

        let unknown = service.get(&ExperimentId::generate().to_string()).await;
        assert!(matches!(unknown, Err(DomainError::NotFound { .. })));

        let malformed = service.get("not-an-id").await;
        assert!(matches!(malformed, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_get_corrupt_record() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .returning(|_, _| Ok(Some("not json".to_string())));

        let service =
            ExperimentService::new(Arc::new(store), Arc::new(PolicyRegistry::with_defaults()));

        let result = service.get(&ExperimentId::generate().to_string()).await;
        assert!(matches!(result, Err(DomainError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_custom_bucket_width() {
        let store = Arc::new(InMemoryStore::new());
        let service = ExperimentService::new(store.clone(), Arc::new(PolicyRegistry::with_defaults()))
            .with_bucket_width(1);

        let id = service.register(greedy_definition()).await.unwrap();
        let raw = store
            .get(&format!("experiments:{}", id.as_u128()), &id.to_string())
            .await
            .unwrap();

        assert!(raw.is_some());
    }
}
