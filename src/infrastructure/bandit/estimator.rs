//! Posterior estimator over stored counters

use std::sync::Arc;

use crate::domain::bandit::{posterior_estimates, ArmEvidence, CounterKey};
use crate::domain::experiment::Experiment;
use crate::domain::store::CounterStore;
use crate::domain::DomainError;

/// Reads per-arm counters and turns them into evidence and estimates
#[derive(Clone)]
pub struct PosteriorEstimator {
    counters: Arc<dyn CounterStore>,
}

impl std::fmt::Debug for PosteriorEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PosteriorEstimator").finish_non_exhaustive()
    }
}

impl PosteriorEstimator {
    pub fn new(counters: Arc<dyn CounterStore>) -> Self {
        Self { counters }
    }

    /// Sample and success counts for every arm, in declaration order
    ///
    /// The two counters of an arm are read independently; a success landing
    /// between the reads only skews one snapshot.
    pub async fn evidence(&self, experiment: &Experiment) -> Result<Vec<ArmEvidence>, DomainError> {
        let id = *experiment.id();
        let mut evidence = Vec::with_capacity(experiment.arm_count());

        for arm in 0..experiment.arm_count() {
            let samples = self.counters.cardinality(&CounterKey::sample(id, arm)).await?;
            let successes = self.counters.cardinality(&CounterKey::success(id, arm)).await?;
            evidence.push(ArmEvidence::new(samples, successes));
        }

        Ok(evidence)
    }

    /// Posterior lower bound for every arm, in declaration order
    pub async fn posterior_estimates(&self, experiment: &Experiment) -> Result<Vec<f64>, DomainError> {
        Ok(posterior_estimates(&self.evidence(experiment).await?))
    }
}
