//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use super::config::MetricsConfig;

const MAX_PATH_LABEL_LENGTH: usize = 64;

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the /metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("bandit_allocator_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);

            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics, path: &str) -> Router {
    Router::new()
        .route(path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// Record an arm handed out by a policy
pub fn record_decision(policy: &str, arm: usize) {
    counter!(
        "bandit_decisions_total",
        "policy" => policy.to_string(),
        "arm" => arm.to_string()
    )
    .increment(1);
}

/// Record a newly attributed success
pub fn record_success(arm: usize) {
    counter!("bandit_successes_total", "arm" => arm.to_string()).increment(1);
}

/// Record a registered experiment
pub fn record_registration(policy: &str) {
    counter!("bandit_experiments_registered_total", "policy" => policy.to_string()).increment(1);
}

fn is_identifier(segment: &str) -> bool {
    let hex_id = segment.len() == 32 && segment.chars().all(|c| c.is_ascii_hexdigit());
    let numeric = !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit());

    hex_id || numeric
}

/// Collapse experiment ids and arm indices so path labels stay low-cardinality
fn sanitize_path(path: &str) -> String {
    let sanitized = path
        .split('/')
        .map(|segment| if is_identifier(segment) { "{id}" } else { segment })
        .collect::<Vec<_>>()
        .join("/");

    if sanitized.len() > MAX_PATH_LABEL_LENGTH {
        sanitized.chars().take(MAX_PATH_LABEL_LENGTH).collect()
    } else {
        sanitized
    }
}
