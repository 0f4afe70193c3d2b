use serde::Deserialize;

use crate::error::{PslError, Result};

/// Default fallback suffix length when no rule matches
pub const DEFAULT_MIN_SUFFIX: usize = 1;

/// Default lookup cache size (0 disables caching)
pub const DEFAULT_CACHE_SIZE: usize = 0;

/// Ruleset construction options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesetOptions {
    /// Suffix length, in labels, used when no rule matches
    pub min_suffix: usize,
    /// LRU cache size for string lookups
    pub cache_size: usize,
}

impl Default for RulesetOptions {
    fn default() -> Self {
        Self {
            min_suffix: DEFAULT_MIN_SUFFIX,
            cache_size: DEFAULT_CACHE_SIZE,
        }
    }
}

impl RulesetOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback suffix length.
    pub fn with_min_suffix(mut self, min_suffix: usize) -> Self {
        self.min_suffix = min_suffix;
        self
    }

    /// Set the lookup cache size.
    pub fn with_cache_size(mut self, size: usize) -> Self {
        self.cache_size = size;
        self
    }

    /// Parse options from a JSON object, e.g. `{"min_suffix": 0}`.
    ///
    /// Unknown keys and ill-typed values fail with [`PslError::ConfigError`].
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PslError::ConfigError(e.to_string()))
    }

    /// Build options from an already-parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| PslError::ConfigError(e.to_string()))
    }
}
