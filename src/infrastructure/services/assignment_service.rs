//! Assignment service - decides arms for sessions and attributes successes

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::domain::bandit::{ArmEvidence, CounterKey};
use crate::domain::experiment::{ArmIndex, Experiment, ExperimentId};
use crate::domain::store::CounterStore;
use crate::domain::{DomainError, SessionId};
use crate::infrastructure::bandit::{PolicyRegistry, PosteriorEstimator, RandomSource};
use crate::infrastructure::observability::{record_decision, record_success};

use super::experiment_service::ExperimentService;

/// Behavioural switches for assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentOptions {
    /// Hand a session its earlier arm instead of drawing again
    pub sticky_sessions: bool,
    /// Only accept a success for an arm the session was served
    pub require_sampled_success: bool,
}

impl Default for AssignmentOptions {
    fn default() -> Self {
        Self {
            sticky_sessions: false,
            require_sampled_success: true,
        }
    }
}

/// Arm handed to a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub experiment_id: ExperimentId,
    pub arm: ArmIndex,
    pub label: String,
    /// Whether this repeats an earlier assignment
    pub repeated: bool,
}

/// Counters and estimate for one arm
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArmStats {
    pub index: ArmIndex,
    pub label: String,
    pub samples: u64,
    pub successes: u64,
    pub lower_bound: f64,
}

/// Per-arm statistics for an experiment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentStats {
    pub experiment_id: ExperimentId,
    pub policy: String,
    pub arms: Vec<ArmStats>,
}

/// Trait for the assignment service (for dynamic dispatch in AppState)
#[async_trait]
pub trait AssignmentServiceTrait: Send + Sync + Debug {
    /// Pick an arm for `session` and record the exposure
    async fn decide(&self, experiment_id: &str, session: &SessionId) -> Result<Decision, DomainError>;

    /// Attribute a success on `arm` to `session`; returns whether it was new
    async fn record_success(
        &self,
        experiment_id: &str,
        arm: ArmIndex,
        session: &SessionId,
    ) -> Result<bool, DomainError>;

    /// Current counters and estimates for every arm
    async fn stats(&self, experiment_id: &str) -> Result<ExperimentStats, DomainError>;
}

/// Coordinates the registry, the policies and the counter store
pub struct AssignmentService {
    experiments: Arc<ExperimentService>,
    counters: Arc<dyn CounterStore>,
    policies: Arc<PolicyRegistry>,
    estimator: PosteriorEstimator,
    random: RandomSource,
    options: AssignmentOptions,
}

impl Debug for AssignmentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssignmentService")
            .field("options", &self.options)
            .field("random", &self.random)
            .finish_non_exhaustive()
    }
}

impl AssignmentService {
    pub fn new(
        experiments: Arc<ExperimentService>,
        counters: Arc<dyn CounterStore>,
        policies: Arc<PolicyRegistry>,
    ) -> Self {
        Self {
            experiments,
            estimator: PosteriorEstimator::new(counters.clone()),
            counters,
            policies,
            random: RandomSource::default(),
            options: AssignmentOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AssignmentOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_random_source(mut self, random: RandomSource) -> Self {
        self.random = random;
        self
    }

    pub fn options(&self) -> AssignmentOptions {
        self.options
    }

    fn decision(experiment: &Experiment, arm: ArmIndex, repeated: bool) -> Decision {
        Decision {
            experiment_id: *experiment.id(),
            arm,
            label: experiment.arm_label(arm).unwrap_or_default().to_string(),
            repeated,
        }
    }

    /// First arm whose sample set already holds `session`
    async fn previous_arm(
        &self,
        experiment: &Experiment,
        session: &SessionId,
    ) -> Result<Option<ArmIndex>, DomainError> {
        for arm in 0..experiment.arm_count() {
            let key = CounterKey::sample(*experiment.id(), arm);
            if self.counters.is_member(&key, session.as_str()).await? {
                return Ok(Some(arm));
            }
        }

        Ok(None)
    }

    #[instrument(skip(self, session), fields(session = %session))]
    pub async fn decide(
        &self,
        experiment_id: &str,
        session: &SessionId,
    ) -> Result<Decision, DomainError> {
        let experiment = self.experiments.get(experiment_id).await?;
        let policy = self.policies.resolve(experiment.policy())?;

        if self.options.sticky_sessions {
            if let Some(arm) = self.previous_arm(&experiment, session).await? {
                debug!(arm, "Repeating earlier assignment");
                return Ok(Self::decision(&experiment, arm, true));
            }
        }

        if !policy.is_implemented() {
            return Err(DomainError::not_implemented(policy.id()));
        }

        let evidence = self.estimator.evidence(&experiment).await?;
        let arm = self
            .random
            .with_rng(|rng| policy.select(&experiment, &evidence, rng))?;

        if !experiment.has_arm(arm) {
            return Err(DomainError::internal(format!(
                "Policy '{}' chose arm {} outside of {} arms",
                policy.id(),
                arm,
                experiment.arm_count()
            )));
        }

        self.counters
            .add_member(&CounterKey::sample(*experiment.id(), arm), session.as_str())
            .await?;

        record_decision(policy.id(), arm);
        debug!(arm, policy = policy.id(), "Arm selected");

        Ok(Self::decision(&experiment, arm, false))
    }

    #[instrument(skip(self, session), fields(session = %session))]
    pub async fn record_success(
        &self,
        experiment_id: &str,
        arm: ArmIndex,
        session: &SessionId,
    ) -> Result<bool, DomainError> {
        let experiment = self.experiments.get(experiment_id).await?;

        if !experiment.has_arm(arm) {
            return Err(DomainError::validation(format!(
                "Arm {} does not exist; experiment '{}' has {} arms",
                arm,
                experiment.id(),
                experiment.arm_count()
            )));
        }

        if self.options.require_sampled_success {
            let sampled = self
                .counters
                .is_member(&CounterKey::sample(*experiment.id(), arm), session.as_str())
                .await?;

            if !sampled {
                return Err(DomainError::validation(format!(
                    "Session was never assigned arm {} of experiment '{}'",
                    arm,
                    experiment.id()
                )));
            }
        }

        let added = self
            .counters
            .add_member(&CounterKey::success(*experiment.id(), arm), session.as_str())
            .await?;

        if added {
            record_success(arm);
            info!(experiment_id = %experiment.id(), arm, "Success recorded");
        }

        Ok(added)
    }

    pub async fn stats(&self, experiment_id: &str) -> Result<ExperimentStats, DomainError> {
        let experiment = self.experiments.get(experiment_id).await?;
        let evidence = self.estimator.evidence(&experiment).await?;

        let arms = experiment
            .arms()
            .iter()
            .zip(evidence)
            .enumerate()
            .map(|(index, (label, ArmEvidence { samples, successes }))| ArmStats {
                index,
                label: label.clone(),
                samples,
                successes,
                lower_bound: ArmEvidence::new(samples, successes).lower_bound(),
            })
            .collect();

        Ok(ExperimentStats {
            experiment_id: *experiment.id(),
            policy: experiment.policy().to_string(),
            arms,
        })
    }
}

#[async_trait]
impl AssignmentServiceTrait for AssignmentService {
    async fn decide(&self, experiment_id: &str, session: &SessionId) -> Result<Decision, DomainError> {
        AssignmentService::decide(self, experiment_id, session).await
    }

    async fn record_success(
        &self,
        experiment_id: &str,
        arm: ArmIndex,
        session: &SessionId,
    ) -> Result<bool, DomainError> {
        AssignmentService::record_success(self, experiment_id, arm, session).await
    }

    async fn stats(&self, experiment_id: &str) -> Result<ExperimentStats, DomainError> {
        AssignmentService::stats(self, experiment_id).await
    }
}
