//! Open policy-parameter record and typed accessors

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::DomainError;

/// Key/value parameters attached to an experiment
///
/// Which keys are required depends on the policy; each policy parses its own
/// typed view out of this record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyParameters(Map<String, Value>);

impl PolicyParameters {
    pub fn new(values: Map<String, Value>) -> Self {
        Self(values)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Read a required finite number
    pub fn require_f64(&self, key: &str) -> Result<f64, DomainError> {
        let value = self
            .0
            .get(key)
            .ok_or_else(|| DomainError::invalid_parameter(format!("'{}' is required", key)))?;

        value
            .as_f64()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                DomainError::invalid_parameter(format!("'{}' must be a number, got {}", key, value))
            })
    }

    /// Read a required number in `[0, 1]`
    pub fn require_probability(&self, key: &str) -> Result<f64, DomainError> {
        let value = self.require_f64(key)?;

        if !(0.0..=1.0).contains(&value) {
            return Err(DomainError::invalid_parameter(format!(
                "'{}' must be between 0 and 1, got {}",
                key, value
            )));
        }

        Ok(value)
    }
}

impl From<Map<String, Value>> for PolicyParameters {
    fn from(values: Map<String, Value>) -> Self {
        Self::new(values)
    }
}
