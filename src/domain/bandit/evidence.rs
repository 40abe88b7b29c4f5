//! Per-arm counter snapshots and keys

use serde::{Deserialize, Serialize};
use std::fmt;

use super::posterior::lower_bound;
use crate::domain::experiment::{ArmIndex, ExperimentId};

/// Which of an arm's two session sets a counter refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterKind {
    Sample,
    Success,
}

impl CounterKind {
    fn namespace(&self) -> &'static str {
        match self {
            Self::Sample => "samples",
            Self::Success => "successes",
        }
    }
}

/// Address of one session set: `(experiment, arm, kind)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CounterKey {
    pub experiment_id: ExperimentId,
    pub arm: ArmIndex,
    pub kind: CounterKind,
}

impl CounterKey {
    pub fn sample(experiment_id: ExperimentId, arm: ArmIndex) -> Self {
        Self {
            experiment_id,
            arm,
            kind: CounterKind::Sample,
        }
    }

    pub fn success(experiment_id: ExperimentId, arm: ArmIndex) -> Self {
        Self {
            experiment_id,
            arm,
            kind: CounterKind::Success,
        }
    }
}

impl fmt::Display for CounterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.kind.namespace(),
            self.experiment_id,
            self.arm
        )
    }
}

/// Observed counters for one arm at read time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmEvidence {
    pub samples: u64,
    pub successes: u64,
}

impl ArmEvidence {
    pub fn new(samples: u64, successes: u64) -> Self {
        Self { samples, successes }
    }

    /// Conservative reward estimate for ranking arms
    pub fn lower_bound(&self) -> f64 {
        lower_bound(self.samples, self.successes)
    }
}

/// Posterior lower bound for every arm, in declaration order
pub fn posterior_estimates(evidence: &[ArmEvidence]) -> Vec<f64> {
    evidence.iter().map(ArmEvidence::lower_bound).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn experiment_id() -> ExperimentId {
        ExperimentId::new("0123456789abcdef0123456789abcdef").unwrap()
    }

    #[test]
    fn test_counter_key_layout() {
        let id = experiment_id();

        assert_eq!(
            CounterKey::sample(id, 2).to_string(),
            "samples:0123456789abcdef0123456789abcdef:2"
        );
        assert_eq!(
            CounterKey::success(id, 0).to_string(),
            "successes:0123456789abcdef0123456789abcdef:0"
        );
    }

    #[test]
    fn test_posterior_estimates_order() {
        let evidence = [
            ArmEvidence::new(10, 1),
            ArmEvidence::new(10, 9),
            ArmEvidence::default(),
        ];
        let estimates = posterior_estimates(&evidence);

        assert_eq!(estimates.len(), 3);
        assert!(estimates[1] > estimates[0]);
        assert_eq!(estimates[2], lower_bound(0, 0));
    }
}
