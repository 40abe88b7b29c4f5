//! Epsilon-greedy selection

use rand::{Rng, RngCore};

use crate::domain::bandit::{posterior_estimates, ArmEvidence, PolicyParameters, SelectionPolicy};
use crate::domain::experiment::{ArmIndex, Experiment};
use crate::domain::DomainError;

pub const EPSILON_GREEDY: &str = "epsilon_greedy";
pub const EPSILON_PARAMETER: &str = "epsilon";

/// Explores a uniformly random arm with probability epsilon, otherwise
/// exploits the arm with the highest posterior lower bound
#[derive(Debug, Default, Clone, Copy)]
pub struct EpsilonGreedy;

impl EpsilonGreedy {
    pub fn new() -> Self {
        Self
    }
}

/// Index of the largest estimate; the earliest arm wins ties
fn best_arm(estimates: &[f64]) -> Option<ArmIndex> {
    let mut best: Option<(ArmIndex, f64)> = None;

    for (index, estimate) in estimates.iter().copied().enumerate() {
        match best {
            Some((_, current)) if estimate <= current => {}
            _ => best = Some((index, estimate)),
        }
    }

    best.map(|(index, _)| index)
}

impl SelectionPolicy for EpsilonGreedy {
    fn id(&self) -> &'static str {
        EPSILON_GREEDY
    }

    fn description(&self) -> &'static str {
        "Explore a random arm with probability epsilon, otherwise pick the best posterior lower bound"
    }

    fn validate_parameters(&self, parameters: &PolicyParameters) -> Result<(), DomainError> {
        parameters.require_probability(EPSILON_PARAMETER).map(|_| ())
    }

    fn select(
        &self,
        experiment: &Experiment,
        evidence: &[ArmEvidence],
        rng: &mut dyn RngCore,
    ) -> Result<ArmIndex, DomainError> {
        let epsilon = experiment.parameters().require_probability(EPSILON_PARAMETER)?;
        let arm_count = evidence.len();

        if arm_count == 0 {
            return Err(DomainError::validation(format!(
                "Experiment '{}' has no arms",
                experiment.id()
            )));
        }

        if rng.gen_range(0.0..1.0) < epsilon {
            return Ok(rng.gen_range(0..arm_count));
        }

        best_arm(&posterior_estimates(evidence)).ok_or_else(|| {
            DomainError::internal(format!("No estimate for experiment '{}'", experiment.id()))
        })
    }
}
