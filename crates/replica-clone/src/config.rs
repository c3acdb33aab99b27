//! Clone configuration
//!
//! Loaded from TOML by the embedding application:
//!
//! ```toml
//! max_nodes = 100000
//! max_depth = 512
//! dropped_fields = "fail"
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Default ceiling on distinct nodes per clone call
pub const DEFAULT_MAX_NODES: usize = 1_000_000;

/// Default ceiling on traversal depth per clone call
pub const DEFAULT_MAX_DEPTH: usize = 1_024;

/// What the serialization strategy does with transient fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DroppedFieldPolicy {
    /// Leave them out of the clone (logged at warn level)
    #[default]
    Drop,

    /// Refuse to encode a value that has any
    Fail,
}

/// Limits and policies shared by both clone strategies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CloneConfig {
    /// Maximum distinct nodes a single clone may visit
    pub max_nodes: usize,

    /// Maximum nesting depth a single clone may descend
    pub max_depth: usize,

    /// Handling of fields invisible to codecs
    pub dropped_fields: DroppedFieldPolicy,
}

impl Default for CloneConfig {
    fn default() -> Self {
        Self {
            max_nodes: DEFAULT_MAX_NODES,
            max_depth: DEFAULT_MAX_DEPTH,
            dropped_fields: DroppedFieldPolicy::Drop,
        }
    }
}

impl CloneConfig {
    /// Parse and validate a TOML document
    ///
    /// # Errors
    /// Returns error if the document is malformed or a limit is zero
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Check limits are usable
    ///
    /// # Errors
    /// Returns error if a limit is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_nodes == 0 {
            return Err(ConfigError::Invalid {
                field: "max_nodes",
                reason: "must be at least 1".into(),
            });
        }
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid {
                field: "max_depth",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Builder: node ceiling
    #[inline]
    #[must_use]
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Builder: depth ceiling
    #[inline]
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Builder: dropped-field policy
    #[inline]
    #[must_use]
    pub fn with_dropped_fields(mut self, policy: DroppedFieldPolicy) -> Self {
        self.dropped_fields = policy;
        self
    }
}
