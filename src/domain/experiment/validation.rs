//! Experiment validation utilities

use thiserror::Error;

use crate::domain::DomainError;

/// Length of an experiment ID (a UUID rendered without hyphens)
pub const EXPERIMENT_ID_LENGTH: usize = 32;

/// Maximum length for an experiment name
pub const MAX_EXPERIMENT_NAME_LENGTH: usize = 200;

/// Validation errors for experiment definitions
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExperimentValidationError {
    #[error("Experiment ID must be {EXPERIMENT_ID_LENGTH} characters, got {0}")]
    InvalidIdLength(usize),

    #[error("Experiment ID contains invalid character: '{0}'")]
    InvalidIdCharacter(char),

    #[error("Experiment name cannot be empty")]
    EmptyName,

    #[error("Experiment name exceeds maximum length of {0} characters")]
    NameTooLong(usize),

    #[error("Experiment policy cannot be empty")]
    EmptyPolicy,

    #[error("Experiment must have at least one arm")]
    NoArms,

    #[error("Arm label at index {0} cannot be empty")]
    EmptyArmLabel(usize),

    #[error("Experiment parameters are required")]
    MissingParameters,

    #[error("Experiment parameters must be a JSON object")]
    ParametersNotObject,
}

impl From<ExperimentValidationError> for DomainError {
    fn from(err: ExperimentValidationError) -> Self {
        DomainError::validation(err.to_string())
    }
}

/// Validate an experiment ID: 32 lowercase hexadecimal characters
pub fn validate_experiment_id(id: &str) -> Result<(), ExperimentValidationError> {
    if id.len() != EXPERIMENT_ID_LENGTH {
        return Err(ExperimentValidationError::InvalidIdLength(id.len()));
    }

    if let Some(c) = id
        .chars()
        .find(|c| !(c.is_ascii_digit() || ('a'..='f').contains(c)))
    {
        return Err(ExperimentValidationError::InvalidIdCharacter(c));
    }

    Ok(())
}

/// Validate a human-readable experiment name
pub fn validate_experiment_name(name: &str) -> Result<(), ExperimentValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ExperimentValidationError::EmptyName);
    }

    if trimmed.chars().count() > MAX_EXPERIMENT_NAME_LENGTH {
        return Err(ExperimentValidationError::NameTooLong(
            MAX_EXPERIMENT_NAME_LENGTH,
        ));
    }

    Ok(())
}

/// Validate the ordered arm labels of an experiment
pub fn validate_arms(arms: &[String]) -> Result<(), ExperimentValidationError> {
    if arms.is_empty() {
        return Err(ExperimentValidationError::NoArms);
    }

    if let Some(index) = arms.iter().position(|label| label.trim().is_empty()) {
        return Err(ExperimentValidationError::EmptyArmLabel(index));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_experiment_id() {
        assert!(validate_experiment_id("0123456789abcdef0123456789abcdef").is_ok());
    }

    #[test]
    fn test_experiment_id_wrong_length() {
        assert_eq!(
            validate_experiment_id("abc"),
            Err(ExperimentValidationError::InvalidIdLength(3))
        );
        assert_eq!(
            validate_experiment_id(""),
            Err(ExperimentValidationError::InvalidIdLength(0))
        );
    }

    #[test]
    fn test_experiment_id_rejects_uppercase_and_hyphens() {
        assert_eq!(
            validate_experiment_id("0123456789ABCDEF0123456789abcdef"),
            Err(ExperimentValidationError::InvalidIdCharacter('A'))
        );
        assert_eq!(
            validate_experiment_id("01234567-89ab-cdef-0123-456789ab"),
            Err(ExperimentValidationError::InvalidIdCharacter('-'))
        );
    }

    #[test]
    fn test_experiment_name() {
        assert!(validate_experiment_name("Checkout button").is_ok());
        assert_eq!(
            validate_experiment_name("   "),
            Err(ExperimentValidationError::EmptyName)
        );
        assert_eq!(
            validate_experiment_name(&"x".repeat(201)),
            Err(ExperimentValidationError::NameTooLong(200))
        );
    }

    #[test]
    fn test_arms() {
        assert!(validate_arms(&["A".to_string()]).is_ok());
        assert_eq!(validate_arms(&[]), Err(ExperimentValidationError::NoArms));
        assert_eq!(
            validate_arms(&["A".to_string(), " ".to_string()]),
            Err(ExperimentValidationError::EmptyArmLabel(1))
        );
    }

    #[test]
    fn test_conversion_to_domain_error() {
        let err: DomainError = ExperimentValidationError::NoArms.into();
        assert!(matches!(err, DomainError::Validation { .. }));
    }
}
