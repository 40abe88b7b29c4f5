//! Bandit Allocator
//!
//! Assigns visitors to experiment arms with multi-armed bandit policies:
//! - Experiments registered with a policy, arms and policy parameters
//! - Per-arm sample and success counters kept as sets of session ids
//! - Posterior lower-bound estimates driving epsilon-greedy and probability matching
//! - In-memory or Redis stores

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::str::FromStr;
use std::time::Duration;

use api::{AppState, AppStateOptions};
use infrastructure::services::AssignmentOptions;
use infrastructure::store::{StoreFactory, StoreSettings, StoreType};
use tracing::info;

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let settings = store_settings(config)?;
    info!(backend = %settings.store_type, "Initializing store");

    let stores = StoreFactory::create(&settings).await?;

    Ok(AppState::from_stores(
        stores,
        AppStateOptions {
            bucket_width: Some(u128::from(config.store.bucket_width)),
            assignment: AssignmentOptions {
                sticky_sessions: config.assignment.sticky_sessions,
                require_sampled_success: config.assignment.require_sampled_success,
            },
            session: (&config.session).into(),
            ..Default::default()
        },
    ))
}

fn store_settings(config: &AppConfig) -> anyhow::Result<StoreSettings> {
    Ok(StoreSettings {
        store_type: StoreType::from_str(&config.store.backend)?,
        redis_url: config.store.redis_url.clone(),
        key_prefix: config.store.key_prefix.clone(),
        connection_timeout: Duration::from_secs(config.store.connection_timeout_secs),
    })
}
