//! Observability settings (`[observability]` section)

use serde::Deserialize;

use crate::domain::DomainError;

/// Paths served by the allocator itself; the metrics route may not shadow them
const RESERVED_PATHS: [&str; 7] = [
    "/",
    "/reset-session",
    "/policies",
    "/experiments",
    "/health",
    "/ready",
    "/live",
];

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ObservabilityConfig {
    #[serde(default)]
    pub tracing: TracingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// OTLP span export. Off unless `enabled` is set.
#[derive(Debug, Clone, Deserialize)]
pub struct TracingConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_otlp_endpoint")]
    pub otlp_endpoint: String,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Fraction of decision traces kept, 0.0 to 1.0
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
}

/// Prometheus scrape endpoint for the decision and success counters
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

impl MetricsConfig {
    /// Scrape path, checked against the routes the allocator already serves
    pub fn route_path(&self) -> Result<String, DomainError> {
        let path = self.path.trim().trim_end_matches('/');

        if !path.starts_with('/') {
            return Err(DomainError::configuration(format!(
                "metrics path '{}' must start with '/'",
                self.path
            )));
        }

        if RESERVED_PATHS.contains(&path) {
            return Err(DomainError::configuration(format!(
                "metrics path '{}' clashes with an API route",
                self.path
            )));
        }

        Ok(path.to_string())
    }
}

fn default_otlp_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_service_name() -> String {
    "bandit-allocator".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

fn default_metrics_enabled() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            otlp_endpoint: default_otlp_endpoint(),
            service_name: default_service_name(),
            sampling_ratio: default_sampling_ratio(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
            path: default_metrics_path(),
        }
    }
}
