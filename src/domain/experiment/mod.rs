//! Experiment domain - immutable experiment definitions

mod entity;
mod validation;

pub use entity::{ArmIndex, Experiment, ExperimentDefinition, ExperimentId};
pub use validation::{
    validate_arms, validate_experiment_id, validate_experiment_name, ExperimentValidationError,
    EXPERIMENT_ID_LENGTH, MAX_EXPERIMENT_NAME_LENGTH,
};
