//! Policy registry

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::bandit::SelectionPolicy;
use crate::domain::DomainError;

use super::epsilon_greedy::EpsilonGreedy;
use super::probability_matching::ProbabilityMatching;
use super::unimplemented::PLACEHOLDERS;

/// Listing entry for a registered policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyInfo {
    pub id: &'static str,
    pub description: &'static str,
    pub implemented: bool,
}

/// Lookup from policy id to implementation
#[derive(Debug, Clone, Default)]
pub struct PolicyRegistry {
    policies: HashMap<&'static str, Arc<dyn SelectionPolicy>>,
}

impl PolicyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in policy
    pub fn with_defaults() -> Self {
        let mut registry = Self::new()
            .with_policy(Arc::new(EpsilonGreedy::new()))
            .with_policy(Arc::new(ProbabilityMatching::new()));

        for placeholder in PLACEHOLDERS {
            registry.register(Arc::new(placeholder));
        }

        registry
    }

    pub fn with_policy(mut self, policy: Arc<dyn SelectionPolicy>) -> Self {
        self.register(policy);
        self
    }

    /// Add or replace a policy under its own id
    pub fn register(&mut self, policy: Arc<dyn SelectionPolicy>) {
        self.policies.insert(policy.id(), policy);
    }

    pub fn resolve(&self, id: &str) -> Result<Arc<dyn SelectionPolicy>, DomainError> {
        self.policies
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::unknown_policy(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.policies.contains_key(id)
    }

    /// Registered policies sorted by id
    pub fn list(&self) -> Vec<PolicyInfo> {
        let mut infos: Vec<PolicyInfo> = self
            .policies
            .values()
            .map(|policy| PolicyInfo {
                id: policy.id(),
                description: policy.description(),
                implemented: policy.is_implemented(),
            })
            .collect();

        infos.sort_by(|a, b| a.id.cmp(b.id));
        infos
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_known_policies() {
        let registry = PolicyRegistry::with_defaults();

        assert_eq!(registry.len(), 8);
        for id in [
            "epsilon_greedy",
            "epsilon_first",
            "epsilon_decreasing",
            "adaptive_epsilon",
            "contextual_epsilon",
            "probability_matching",
            "pricing",
            "ethical",
        ] {
            assert!(registry.contains(id), "missing {}", id);
        }
    }

    #[test]
    fn test_resolve_unknown_policy() {
        let registry = PolicyRegistry::with_defaults();

        match registry.resolve("thompson") {
            Err(DomainError::UnknownPolicy { policy }) => assert_eq!(policy, "thompson"),
            other => panic!("expected UnknownPolicy, got {:?}", other),
        }
    }

    #[test]
    fn test_list_is_sorted_and_flags_placeholders() {
        let list = PolicyRegistry::with_defaults().list();

        assert_eq!(list.first().map(|p| p.id), Some("adaptive_epsilon"));
        assert!(list.windows(2).all(|w| w[0].id < w[1].id));

        let implemented: Vec<_> = list.iter().filter(|p| p.implemented).map(|p| p.id).collect();
        assert_eq!(implemented, vec!["epsilon_greedy", "probability_matching"]);
    }

    #[test]
    fn test_empty_registry() {
        let registry = PolicyRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.resolve("epsilon_greedy").is_err());
    }
}
