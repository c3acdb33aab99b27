//! Registry configuration
//!
//! ```toml
//! default_strategy = "structural"
//!
//! [clone]
//! max_nodes = 50000
//! dropped_fields = "fail"
//! ```

use replica_clone::{CloneConfig, ConfigError, StrategyKind};
use serde::{Deserialize, Serialize};

/// How a registry clones the templates it stamps
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Strategy used by `stamp`
    pub default_strategy: StrategyKind,

    /// Limits and policies passed to the strategy
    pub clone: CloneConfig,
}

impl RegistryConfig {
    /// Parse and validate a TOML document
    ///
    /// # Errors
    /// Returns error if the document is malformed or a limit is invalid
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.clone.validate()?;
        Ok(config)
    }

    /// Builder: default strategy
    #[inline]
    #[must_use]
    pub fn with_strategy(mut self, kind: StrategyKind) -> Self {
        self.default_strategy = kind;
        self
    }

    /// Builder: clone limits
    #[inline]
    #[must_use]
    pub fn with_clone_config(mut self, clone: CloneConfig) -> Self {
        self.clone = clone;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use replica_clone::DroppedFieldPolicy;

    #[test]
    fn defaults_to_structural() {
        let c = RegistryConfig::default();
        assert_eq!(c.default_strategy, StrategyKind::Structural);
        assert_eq!(c.clone, CloneConfig::default());
    }

    #[test]
    fn from_toml_nested() {
        let c = RegistryConfig::from_toml_str(
            "default_strategy = \"serialization\"\n[clone]\nmax_nodes = 10\ndropped_fields = \"fail\"\n",
        )
        .unwrap();
        assert_eq!(c.default_strategy, StrategyKind::Serialization);
        assert_eq!(c.clone.max_nodes, 10);
        assert_eq!(c.clone.dropped_fields, DroppedFieldPolicy::Fail);
    }

    #[test]
    fn rejects_unknown_strategy() {
        assert!(matches!(
            RegistryConfig::from_toml_str("default_strategy = \"magic\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn rejects_invalid_limits() {
        assert!(matches!(
            RegistryConfig::from_toml_str("[clone]\nmax_depth = 0"),
            Err(ConfigError::Invalid { field: "max_depth", .. })
        ));
    }
}
