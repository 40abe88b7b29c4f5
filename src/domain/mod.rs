//! Domain layer - Core entities, bandit math and store ports

pub mod bandit;
pub mod error;
pub mod experiment;
pub mod session;
pub mod store;

pub use bandit::{
    lower_bound, posterior_estimates, ArmEvidence, CounterKey, CounterKind, PolicyParameters,
    SelectionPolicy,
};
pub use error::DomainError;
pub use experiment::{ArmIndex, Experiment, ExperimentDefinition, ExperimentId};
pub use session::SessionId;
pub use store::{CounterStore, KeyValueStore};
