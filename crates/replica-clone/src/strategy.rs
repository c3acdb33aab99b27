//! Clone strategy trait and strategy selection
//!
//! Provides the [`CloneStrategy`] trait implemented by the structural and
//! serialization engines.

use crate::codec::JsonCodec;
use crate::config::CloneConfig;
use crate::error::CloneError;
use crate::serialization::SerializationCloner;
use crate::structural::StructuralCloner;
use replica_value::Value;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Deep clone strategy
///
/// # Contract
/// - The returned value shares no node with `root`
/// - Equal sources give deep-equal clones (identities differ)
/// - On error, `root` is untouched and nothing partial is returned
pub trait CloneStrategy: Send + Sync + std::fmt::Debug {
    /// Produce an independent deep copy of `root`
    ///
    /// # Errors
    /// Returns [`CloneError`] if the graph cannot be copied under this strategy
    fn clone_value(&self, root: &Value) -> Result<Value, CloneError>;

    /// How faithfully the strategy reproduces graph shape
    fn fidelity(&self) -> Fidelity;

    /// Strategy name (for logging/configuration)
    fn name(&self) -> &'static str;
}

/// Graph-shape fidelity of a strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fidelity {
    /// Shared references stay shared and cycles are reproduced
    Graph,

    /// Shared references are duplicated and cycles are rejected
    Tree,
}

impl Fidelity {
    /// Check if shared references survive cloning
    #[inline]
    #[must_use]
    pub fn preserves_sharing(&self) -> bool {
        matches!(self, Self::Graph)
    }
}

/// Built-in strategies, selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Node-by-node traversal with a cycle guard
    #[default]
    Structural,

    /// Encode/decode round trip through [`JsonCodec`]
    Serialization,
}

impl StrategyKind {
    /// Instantiate the strategy with `config`
    #[must_use]
    pub fn build(self, config: &CloneConfig) -> Arc<dyn CloneStrategy> {
        match self {
            Self::Structural => Arc::new(StructuralCloner::with_config(config.clone())),
            Self::Serialization => Arc::new(SerializationCloner::new(JsonCodec::with_config(
                config.clone(),
            ))),
        }
    }

    /// Strategy name as used in configuration
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Structural => "structural",
            Self::Serialization => "serialization",
        }
    }
}
