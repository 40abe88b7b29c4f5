//! Infrastructure layer - Store backends, policies, services and observability

pub mod bandit;
pub mod logging;
pub mod observability;
pub mod services;
pub mod store;
