//! Request and response bodies for the experiment endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::bandit::PolicyParameters;
use crate::domain::experiment::{ArmIndex, Experiment, ExperimentId};
use crate::infrastructure::bandit::PolicyInfo;
use crate::infrastructure::services::{ArmStats, ExperimentStats};

/// Plain acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentCreatedResponse {
    pub message: String,
    pub experiment_id: ExperimentId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceResponse {
    pub message: String,
    pub choice: ArmIndex,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub message: String,
    /// False when the session's success on this arm was already counted
    pub recorded: bool,
}

/// Registered experiment as shown to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentResponse {
    pub id: ExperimentId,
    pub name: String,
    pub policy: String,
    pub choices: Vec<String>,
    pub parameters: PolicyParameters,
    pub created_at: DateTime<Utc>,
}

impl From<Experiment> for ExperimentResponse {
    fn from(experiment: Experiment) -> Self {
        Self {
            id: *experiment.id(),
            name: experiment.name().to_string(),
            policy: experiment.policy().to_string(),
            choices: experiment.arms().to_vec(),
            parameters: experiment.parameters().clone(),
            created_at: experiment.created_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub experiment_id: ExperimentId,
    pub policy: String,
    pub choices: Vec<ArmStats>,
}

impl From<ExperimentStats> for StatsResponse {
    fn from(stats: ExperimentStats) -> Self {
        Self {
            experiment_id: stats.experiment_id,
            policy: stats.policy,
            choices: stats.arms,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PoliciesResponse {
    pub policies: Vec<PolicyInfo>,
}
