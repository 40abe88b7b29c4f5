//! API request/response types

pub mod error;
pub mod experiments;
pub mod json;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use experiments::{
    ChoiceResponse, ExperimentCreatedResponse, ExperimentResponse, MessageResponse,
    PoliciesResponse, StatsResponse, SuccessResponse,
};
pub use json::Json;
