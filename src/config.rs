use serde::{Deserialize, Serialize};

/// Validator configuration options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Maximum number of nested object levels descended into below the
    /// request fragment (default: 100)
    pub max_depth: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self { max_depth: 100 }
    }
}

impl ValidatorConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
