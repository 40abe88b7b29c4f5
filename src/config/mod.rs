//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AssignmentConfig, LogFormat, LoggingConfig, ServerConfig, SessionConfig,
    StoreConfig,
};
