//! Arm-selection policy capability

use rand::RngCore;
use std::fmt::Debug;

use super::evidence::ArmEvidence;
use super::parameters::PolicyParameters;
use crate::domain::experiment::{ArmIndex, Experiment};
use crate::domain::DomainError;

/// A pluggable strategy that picks an arm given an experiment's evidence
///
/// `evidence` holds one entry per arm in declaration order. Implementations
/// are pure over their inputs; all randomness is drawn from `rng` so a
/// seeded source makes outcomes reproducible.
pub trait SelectionPolicy: Send + Sync + Debug {
    /// Identifier experiments use to reference this policy
    fn id(&self) -> &'static str;

    /// One-line summary shown in policy listings
    fn description(&self) -> &'static str;

    /// Whether `select` produces a decision
    fn is_implemented(&self) -> bool {
        true
    }

    /// Check the typed parameters this policy needs
    fn validate_parameters(&self, parameters: &PolicyParameters) -> Result<(), DomainError>;

    /// Choose an arm index
    fn select(
        &self,
        experiment: &Experiment,
        evidence: &[ArmEvidence],
        rng: &mut dyn RngCore,
    ) -> Result<ArmIndex, DomainError>;
}
