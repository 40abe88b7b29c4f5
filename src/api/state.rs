//! Application state for shared services

use std::sync::Arc;

use crate::api::middleware::SessionSettings;
use crate::domain::store::KeyValueStore;
use crate::infrastructure::bandit::{PolicyRegistry, RandomSource};
use crate::infrastructure::services::{
    AssignmentOptions, AssignmentService, AssignmentServiceTrait, ExperimentService,
    ExperimentServiceTrait,
};
use crate::infrastructure::store::StoreHandles;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub experiment_service: Arc<dyn ExperimentServiceTrait>,
    pub assignment_service: Arc<dyn AssignmentServiceTrait>,
    pub policies: Arc<PolicyRegistry>,
    /// Probed by the readiness check
    pub store: Arc<dyn KeyValueStore>,
    pub session: SessionSettings,
}

/// Knobs for wiring services onto a set of stores
#[derive(Debug, Default)]
pub struct AppStateOptions {
    pub bucket_width: Option<u128>,
    pub assignment: AssignmentOptions,
    pub random: RandomSource,
    pub session: SessionSettings,
}

impl AppState {
    /// Wire the registry and both services onto `stores`
    pub fn from_stores(stores: StoreHandles, options: AppStateOptions) -> Self {
        let policies = Arc::new(PolicyRegistry::with_defaults());

        let mut experiments = ExperimentService::new(stores.definitions.clone(), policies.clone());
        if let Some(width) = options.bucket_width {
            experiments = experiments.with_bucket_width(width);
        }
        let experiments = Arc::new(experiments);

        let assignments = AssignmentService::new(experiments.clone(), stores.counters, policies.clone())
            .with_options(options.assignment)
            .with_random_source(options.random);

        Self {
            experiment_service: experiments,
            assignment_service: Arc::new(assignments),
            policies,
            store: stores.definitions,
            session: options.session,
        }
    }
}
