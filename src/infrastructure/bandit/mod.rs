//! Bandit policies, the policy registry and the posterior estimator

mod epsilon_greedy;
mod estimator;
mod probability_matching;
mod random;
mod registry;
mod unimplemented;

pub use epsilon_greedy::{EpsilonGreedy, EPSILON_GREEDY, EPSILON_PARAMETER};
pub use estimator::PosteriorEstimator;
pub use probability_matching::{ProbabilityMatching, PROBABILITY_MATCHING};
pub use random::RandomSource;
pub use registry::{PolicyInfo, PolicyRegistry};
pub use unimplemented::{UnimplementedPolicy, PLACEHOLDERS};
