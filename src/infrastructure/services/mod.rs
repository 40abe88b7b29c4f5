//! Infrastructure services

mod assignment_service;
mod experiment_service;

pub use assignment_service::{
    ArmStats, AssignmentOptions, AssignmentService, AssignmentServiceTrait, Decision,
    ExperimentStats,
};
pub use experiment_service::{ExperimentService, ExperimentServiceTrait, DEFAULT_BUCKET_WIDTH};
