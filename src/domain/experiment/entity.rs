//! Experiment domain entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

use super::validation::{
    validate_arms, validate_experiment_id, validate_experiment_name, ExperimentValidationError,
};
use crate::domain::bandit::PolicyParameters;

/// Position of an arm in an experiment's arm sequence (0-based)
pub type ArmIndex = usize;

// ============================================================================
// ExperimentId
// ============================================================================

/// Opaque experiment identifier: a random UUID rendered as 32 lowercase hex chars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExperimentId(Uuid);

impl ExperimentId {
    /// Generate a fresh random experiment ID
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an experiment ID with validation
    pub fn new(id: impl AsRef<str>) -> Result<Self, ExperimentValidationError> {
        let id = id.as_ref();
        validate_experiment_id(id)?;

        Uuid::try_parse(id)
            .map(Self)
            .map_err(|_| ExperimentValidationError::InvalidIdLength(id.len()))
    }

    /// Numeric value of the identifier
    pub fn as_u128(&self) -> u128 {
        self.0.as_u128()
    }

    /// Bucket the identifier falls in for a given bucket width
    ///
    /// Used to spread experiment definitions across many hash keys instead
    /// of one hot key. A width of zero is treated as one.
    pub fn bucket(&self, width: u128) -> u128 {
        self.as_u128() / width.max(1)
    }
}

impl TryFrom<String> for ExperimentId {
    type Error = ExperimentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ExperimentId> for String {
    fn from(id: ExperimentId) -> Self {
        id.to_string()
    }
}

impl fmt::Display for ExperimentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

// ============================================================================
// ExperimentDefinition
// ============================================================================

/// Experiment definition as submitted for registration
///
/// Missing fields default to empty values so that registration reports a
/// validation error instead of a decoding error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperimentDefinition {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub policy: String,
    #[serde(default, alias = "choices")]
    pub arms: Vec<String>,
    #[serde(default)]
    pub parameters: Option<Value>,
}

impl ExperimentDefinition {
    pub fn new(name: impl Into<String>, policy: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            policy: policy.into(),
            arms: Vec::new(),
            parameters: Some(Value::Object(Default::default())),
        }
    }

    pub fn with_arms<I, S>(mut self, arms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arms = arms.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_parameters(mut self, parameters: Value) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// Structural validation; policy-specific checks happen in the registry
    pub fn validate(&self) -> Result<PolicyParameters, ExperimentValidationError> {
        validate_experiment_name(&self.name)?;

        if self.policy.trim().is_empty() {
            return Err(ExperimentValidationError::EmptyPolicy);
        }

        validate_arms(&self.arms)?;

        match &self.parameters {
            None | Some(Value::Null) => Err(ExperimentValidationError::MissingParameters),
            Some(Value::Object(map)) => Ok(PolicyParameters::new(map.clone())),
            Some(_) => Err(ExperimentValidationError::ParametersNotObject),
        }
    }
}

// ============================================================================
// Experiment
// ============================================================================

/// A registered, immutable experiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    id: ExperimentId,
    name: String,
    policy: String,
    arms: Vec<String>,
    parameters: PolicyParameters,
    created_at: DateTime<Utc>,
}

impl Experiment {
    /// Build an experiment from a definition that passed validation
    pub fn new(
        id: ExperimentId,
        definition: ExperimentDefinition,
        parameters: PolicyParameters,
    ) -> Self {
        Self {
            id,
            name: definition.name.trim().to_string(),
            policy: definition.policy.trim().to_string(),
            arms: definition.arms,
            parameters,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &ExperimentId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> &str {
        &self.policy
    }

    pub fn arms(&self) -> &[String] {
        &self.arms
    }

    pub fn arm_count(&self) -> usize {
        self.arms.len()
    }

    pub fn arm_label(&self, index: ArmIndex) -> Option<&str> {
        self.arms.get(index).map(String::as_str)
    }

    pub fn has_arm(&self, index: ArmIndex) -> bool {
        index < self.arms.len()
    }

    pub fn parameters(&self) -> &PolicyParameters {
        &self.parameters
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn definition() -> ExperimentDefinition {
        ExperimentDefinition::new("Test experiment", "epsilon_greedy")
            .with_arms(["A", "B", "C"])
            .with_parameters(json!({"epsilon": 0.1}))
    }

    #[test]
    fn test_experiment_id_round_trip_display() {
        let id = ExperimentId::generate();
        let rendered = id.to_string();

        assert_eq!(rendered.len(), 32);
        assert_eq!(ExperimentId::new(&rendered).unwrap(), id);
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        assert_ne!(ExperimentId::generate(), ExperimentId::generate());
    }

    #[test]
    fn test_experiment_id_bucket() {
        let id = ExperimentId::new("000000000000000000000000000007d1").unwrap();

        assert_eq!(id.as_u128(), 2001);
        assert_eq!(id.bucket(1000), 2);
        assert_eq!(id.bucket(0), 2001);
    }

    #[test]
    fn test_experiment_id_serde() {
        let id = ExperimentId::new("0123456789abcdef0123456789abcdef").unwrap();
        let json = serde_json::to_string(&id).unwrap();

        assert_eq!(json, "\"0123456789abcdef0123456789abcdef\"");
        assert!(serde_json::from_str::<ExperimentId>("\"not-an-id\"").is_err());
    }

    #[test]
    fn test_definition_accepts_choices_alias() {
        let definition: ExperimentDefinition = serde_json::from_value(json!({
            "name": "Legacy",
            "policy": "probability_matching",
            "choices": ["x", "y"],
            "parameters": {}
        }))
        .unwrap();

        assert_eq!(definition.arms, vec!["x", "y"]);
    }

    #[test]
    fn test_definition_validate() {
        let parameters = definition().validate().unwrap();
        assert_eq!(parameters.get("epsilon"), Some(&json!(0.1)));
    }

    #[test]
    fn test_definition_validate_rejects_missing_parts() {
        let mut missing_name = definition();
        missing_name.name = String::new();
        assert_eq!(
            missing_name.validate(),
            Err(ExperimentValidationError::EmptyName)
        );

        let mut missing_policy = definition();
        missing_policy.policy = " ".to_string();
        assert_eq!(
            missing_policy.validate(),
            Err(ExperimentValidationError::EmptyPolicy)
        );

        let no_arms = definition().with_arms(Vec::<String>::new());
        assert_eq!(no_arms.validate(), Err(ExperimentValidationError::NoArms));

        let mut no_parameters = definition();
        no_parameters.parameters = None;
        assert_eq!(
            no_parameters.validate(),
            Err(ExperimentValidationError::MissingParameters)
        );

        let scalar_parameters = definition().with_parameters(json!(0.1));
        assert_eq!(
            scalar_parameters.validate(),
            Err(ExperimentValidationError::ParametersNotObject)
        );
    }

    #[test]
    fn test_experiment_accessors() {
        let definition = definition();
        let parameters = definition.validate().unwrap();
        let experiment = Experiment::new(ExperimentId::generate(), definition, parameters);

        assert_eq!(experiment.name(), "Test experiment");
        assert_eq!(experiment.policy(), "epsilon_greedy");
        assert_eq!(experiment.arm_count(), 3);
        assert_eq!(experiment.arm_label(1), Some("B"));
        assert!(experiment.has_arm(2));
        assert!(!experiment.has_arm(3));
    }

    #[test]
    fn test_experiment_json_round_trip() {
        let definition = definition();
        let parameters = definition.validate().unwrap();
        let experiment = Experiment::new(ExperimentId::generate(), definition, parameters);

        let json = serde_json::to_string(&experiment).unwrap();
        let decoded: Experiment = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded, experiment);
    }
}
