//! Bandit domain - counters, posterior math and the policy capability

mod evidence;
mod parameters;
mod policy;
pub mod posterior;

pub use evidence::{posterior_estimates, ArmEvidence, CounterKey, CounterKind};
pub use parameters::PolicyParameters;
pub use policy::SelectionPolicy;
pub use posterior::{lower_bound, lower_bound_with_prior};
