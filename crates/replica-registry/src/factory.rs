//! Prototype factory
//!
//! Provides [`PrototypeFactory`], which stamps a registered template and
//! applies caller-supplied [`Overrides`] to the fresh clone.

use crate::error::{FactoryError, RegistryError};
use crate::registry::PrototypeRegistry;
use replica_value::{FieldPath, Value};
use std::sync::Arc;

/// Ordered field-path → value assignments
///
/// Applied in insertion order, so a later override of the same path wins.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    entries: Vec<(FieldPath, Value)>,
}

impl Overrides {
    /// No overrides
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: parse `path` and add an assignment
    ///
    /// # Errors
    /// Returns [`FactoryError::InvalidFieldPath`] if `path` does not parse
    pub fn set(mut self, path: &str, value: impl Into<Value>) -> Result<Self, FactoryError> {
        let parsed = path.parse::<FieldPath>().map_err(|reason| FactoryError::InvalidFieldPath {
            path: FieldPath::single(path),
            reason,
        })?;
        self.entries.push((parsed, value.into()));
        Ok(self)
    }

    /// Builder: add an assignment with an already parsed path
    #[inline]
    #[must_use]
    pub fn with(mut self, path: FieldPath, value: impl Into<Value>) -> Self {
        self.entries.push((path, value.into()));
        self
    }

    /// Number of assignments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no assignments
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply every assignment to `target`
    ///
    /// # Errors
    /// Returns [`FactoryError::InvalidFieldPath`] for the first path that
    /// does not resolve to an existing slot. Earlier assignments stay applied.
    pub fn apply(self, target: &mut Value) -> Result<(), FactoryError> {
        for (path, value) in self.entries {
            if let Err(reason) = target.assign(&path, value) {
                return Err(FactoryError::InvalidFieldPath { path, reason });
            }
        }
        Ok(())
    }
}

/// Builds configured instances from registered prototypes
#[derive(Debug, Clone)]
pub struct PrototypeFactory {
    registry: Arc<PrototypeRegistry>,
}

impl PrototypeFactory {
    /// Factory over `registry`
    #[inline]
    #[must_use]
    pub fn new(registry: Arc<PrototypeRegistry>) -> Self {
        Self { registry }
    }

    /// Underlying registry
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Arc<PrototypeRegistry> {
        &self.registry
    }

    /// Stamp `prototype` and apply `overrides` to the clone
    ///
    /// The clone is returned only when every override applied; on failure it
    /// is discarded and neither the registry nor the template changes.
    ///
    /// # Errors
    /// - [`FactoryError::Registry`] if stamping fails (including a miss)
    /// - [`FactoryError::InvalidFieldPath`] if an override does not resolve
    pub fn create(&self, prototype: &str, overrides: Overrides) -> Result<Value, FactoryError> {
        let mut instance = self.registry.stamp(prototype)?;
        overrides.apply(&mut instance).map_err(|err| {
            tracing::warn!(prototype, error = %err, "override rejected");
            err
        })?;
        tracing::debug!(prototype, "instance created");
        Ok(instance)
    }

    /// Stamp `prototype` without overrides
    ///
    /// # Errors
    /// Returns [`RegistryError`] if stamping fails
    pub fn create_default(&self, prototype: &str) -> Result<Value, RegistryError> {
        self.registry.stamp(prototype)
    }
}
