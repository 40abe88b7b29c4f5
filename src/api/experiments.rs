//! Experiment, decision and session endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension,
};
use serde_json::Value;
use tracing::debug;

use super::middleware::RenewedSession;
use super::state::AppState;
use super::types::{
    ApiError, ChoiceResponse, ExperimentCreatedResponse, ExperimentResponse, Json,
    MessageResponse, PoliciesResponse, StatsResponse, SuccessResponse,
};
use crate::domain::experiment::{ArmIndex, ExperimentDefinition};
use crate::domain::{DomainError, SessionId};

/// GET / - greeting; the session layer issues the cookie
pub async fn index(Extension(session): Extension<SessionId>) -> Json<MessageResponse> {
    debug!(session = %session, "Greeting");
    Json(MessageResponse::new("Hello."))
}

/// POST /experiments
pub async fn register_experiment(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let definition: ExperimentDefinition = serde_json::from_value(body)
        .map_err(|e| DomainError::validation(format!("Invalid experiment definition: {}", e)))?;
    let experiment_id = state.experiment_service.register(definition).await?;

    Ok((
        StatusCode::CREATED,
        Json(ExperimentCreatedResponse {
            message: "New experiment created.".to_string(),
            experiment_id,
        }),
    ))
}

/// GET /experiments/{id}
pub async fn get_experiment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ExperimentResponse>, ApiError> {
    let experiment = state.experiment_service.get(&id).await?;
    Ok(Json(experiment.into()))
}

/// GET /experiments/{id}/choice
pub async fn choose(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(session): Extension<SessionId>,
) -> Result<Json<ChoiceResponse>, ApiError> {
    let decision = state.assignment_service.decide(&id, &session).await?;

    Ok(Json(ChoiceResponse {
        message: "Ok.".to_string(),
        choice: decision.arm,
        label: decision.label,
    }))
}

/// POST /experiments/{id}/choices/{arm}/success
pub async fn record_success(
    State(state): State<AppState>,
    Path((id, arm)): Path<(String, String)>,
    Extension(session): Extension<SessionId>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let arm: ArmIndex = arm.parse().map_err(|_| {
        ApiError::bad_request(format!("Choice '{}' is not a non-negative integer", arm))
            .with_param("arm")
    })?;

    let recorded = state
        .assignment_service
        .record_success(&id, arm, &session)
        .await?;

    Ok(Json(SuccessResponse {
        message: "Ok.".to_string(),
        recorded,
    }))
}

/// GET /experiments/{id}/stats
pub async fn experiment_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StatsResponse>, ApiError> {
    let stats = state.assignment_service.stats(&id).await?;
    Ok(Json(stats.into()))
}

/// GET /policies
pub async fn list_policies(State(state): State<AppState>) -> Json<PoliciesResponse> {
    Json(PoliciesResponse {
        policies: state.policies.list(),
    })
}

/// GET /reset-session
pub async fn reset_session() -> impl IntoResponse {
    let mut response = Json(MessageResponse::new("Session reset.")).into_response();
    response
        .extensions_mut()
        .insert(RenewedSession(SessionId::generate()));
    response
}
