use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::experiments;
use super::health;
use super::middleware::{logging_middleware, metrics_middleware, session_middleware};
use super::state::AppState;

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    let session = state.session.clone();

    let api = Router::new()
        .route("/", get(experiments::index))
        .route("/reset-session", get(experiments::reset_session))
        .route("/policies", get(experiments::list_policies))
        .route("/experiments", post(experiments::register_experiment))
        .route("/experiments/{id}", get(experiments::get_experiment))
        .route("/experiments/{id}/choice", get(experiments::choose))
        .route(
            "/experiments/{id}/choices/{arm}/success",
            post(experiments::record_success),
        )
        .route("/experiments/{id}/stats", get(experiments::experiment_stats))
        .layer(from_fn_with_state(session, session_middleware));

    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .merge(api)
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}
