//! Probability matching over observed successes

use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, RngCore};

use crate::domain::bandit::{ArmEvidence, PolicyParameters, SelectionPolicy};
use crate::domain::experiment::{ArmIndex, Experiment};
use crate::domain::DomainError;

pub const PROBABILITY_MATCHING: &str = "probability_matching";

/// Picks each arm with probability proportional to its success count
///
/// With no successes anywhere the draw is uniform.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProbabilityMatching;

impl ProbabilityMatching {
    pub fn new() -> Self {
        Self
    }
}

impl SelectionPolicy for ProbabilityMatching {
    fn id(&self) -> &'static str {
        PROBABILITY_MATCHING
    }

    fn description(&self) -> &'static str {
        "Pick each arm with probability proportional to its successes"
    }

    fn validate_parameters(&self, _parameters: &PolicyParameters) -> Result<(), DomainError> {
        Ok(())
    }

    fn select(
        &self,
        experiment: &Experiment,
        evidence: &[ArmEvidence],
        rng: &mut dyn RngCore,
    ) -> Result<ArmIndex, DomainError> {
        if evidence.is_empty() {
            return Err(DomainError::validation(format!(
                "Experiment '{}' has no arms",
                experiment.id()
            )));
        }

        let weights: Vec<u64> = evidence.iter().map(|e| e.successes).collect();

        if weights.iter().all(|w| *w == 0) {
            return Ok(rng.gen_range(0..evidence.len()));
        }

        let distribution = WeightedIndex::new(&weights)
            .map_err(|e| DomainError::internal(format!("Invalid success weights: {}", e)))?;

        Ok(distribution.sample(rng))
    }
}
