//! Policies that are registered by name but have no selection rule yet

use rand::RngCore;

use crate::domain::bandit::{ArmEvidence, PolicyParameters, SelectionPolicy};
use crate::domain::experiment::{ArmIndex, Experiment};
use crate::domain::DomainError;

/// A named placeholder whose `select` always fails with `NotImplemented`
///
/// Experiments may still be registered against these so that clients can
/// provision ahead of the rule landing.
#[derive(Debug, Clone, Copy)]
pub struct UnimplementedPolicy {
    id: &'static str,
    description: &'static str,
}

impl UnimplementedPolicy {
    pub const fn new(id: &'static str, description: &'static str) -> Self {
        Self { id, description }
    }
}

pub const EPSILON_FIRST: UnimplementedPolicy =
    UnimplementedPolicy::new("epsilon_first", "Pure exploration for a fixed budget, then exploitation");
pub const EPSILON_DECREASING: UnimplementedPolicy =
    UnimplementedPolicy::new("epsilon_decreasing", "Exploration rate that decays over time");
pub const ADAPTIVE_EPSILON: UnimplementedPolicy =
    UnimplementedPolicy::new("adaptive_epsilon", "Exploration rate driven by observed value differences");
pub const CONTEXTUAL_EPSILON: UnimplementedPolicy =
    UnimplementedPolicy::new("contextual_epsilon", "Epsilon-greedy conditioned on request context");
pub const PRICING: UnimplementedPolicy =
    UnimplementedPolicy::new("pricing", "Prices each arm by expected reward plus the expected value of more information");
pub const ETHICAL: UnimplementedPolicy =
    UnimplementedPolicy::new("ethical", "Minimizes assignments to inferior arms to keep regret low");

/// Every placeholder policy, in listing order
pub const PLACEHOLDERS: [UnimplementedPolicy; 6] = [
    EPSILON_FIRST,
    EPSILON_DECREASING,
    ADAPTIVE_EPSILON,
    CONTEXTUAL_EPSILON,
    PRICING,
    ETHICAL,
];

impl SelectionPolicy for UnimplementedPolicy {
    fn id(&self) -> &'static str {
        self.id
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn is_implemented(&self) -> bool {
        false
    }

    fn validate_parameters(&self, _parameters: &PolicyParameters) -> Result<(), DomainError> {
        Ok(())
    }

    fn select(
        &self,
        _experiment: &Experiment,
        _evidence: &[ArmEvidence],
        _rng: &mut dyn RngCore,
    ) -> Result<ArmIndex, DomainError> {
        Err(DomainError::not_implemented(self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::experiment::{ExperimentDefinition, ExperimentId};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_placeholders_refuse_to_select() {
        let mut rng = StdRng::seed_from_u64(0);

        for policy in PLACEHOLDERS {
            let experiment = Experiment::new(
                ExperimentId::generate(),
                ExperimentDefinition::new("placeholder", policy.id()).with_arms(["A", "B"]),
                PolicyParameters::empty(),
            );

            assert!(!policy.is_implemented());
            assert!(policy.validate_parameters(&PolicyParameters::empty()).is_ok());

            match policy.select(&experiment, &[ArmEvidence::default(); 2], &mut rng) {
                Err(DomainError::NotImplemented { policy: id }) => assert_eq!(id, policy.id()),
                other => panic!("expected NotImplemented, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_pricing_and_ethical_descriptions() {
        assert!(PRICING.description().contains("expected value of more information"));
        assert!(ETHICAL.description().contains("inferior arms"));
    }
}
