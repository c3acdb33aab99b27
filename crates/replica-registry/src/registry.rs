//! Prototype registry
//!
//! Provides [`PrototypeRegistry`]: named templates plus lookup-and-clone as
//! one operation.

use crate::config::RegistryConfig;
use crate::error::RegistryError;
use parking_lot::RwLock;
use replica_clone::{CloneStrategy, StructuralCloner};
use replica_value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Registry of named prototype templates
///
/// # Invariants
/// - Stored templates are never handed out; `stamp` always returns a clone
/// - A template only changes through `register`/`unregister` under the
///   same name
///
/// # Concurrency
/// Single writer / multiple readers per registry instance. `stamp` clones
/// while holding the read lock, so a concurrent `register` of the same name
/// waits for in-flight stamps and stamps never observe a half-replaced map.
pub struct PrototypeRegistry {
    prototypes: RwLock<HashMap<String, Value>>,
    strategy: Arc<dyn CloneStrategy>,
}

impl PrototypeRegistry {
    /// Empty registry stamping with the structural strategy
    #[must_use]
    pub fn new() -> Self {
        Self::with_strategy(Arc::new(StructuralCloner::new()))
    }

    /// Empty registry stamping with `strategy`
    #[must_use]
    pub fn with_strategy(strategy: Arc<dyn CloneStrategy>) -> Self {
        Self {
            prototypes: RwLock::new(HashMap::new()),
            strategy,
        }
    }

    /// Empty registry configured from `config`
    #[must_use]
    pub fn with_config(config: &RegistryConfig) -> Self {
        Self::with_strategy(config.default_strategy.build(&config.clone))
    }

    /// Registry pre-populated from `(name, template)` pairs
    ///
    /// Later pairs replace earlier ones with the same name.
    #[must_use]
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let registry = Self::new();
        registry.extend(entries);
        registry
    }

    /// Register every `(name, template)` pair under one write lock
    pub fn extend<I, S>(&self, entries: I)
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let mut prototypes = self.prototypes.write();
        for (name, template) in entries {
            prototypes.insert(name.into(), template);
        }
    }

    /// Store `template` under `name` as given (no copy is taken)
    ///
    /// Returns the template previously registered under the name.
    pub fn register(&self, name: impl Into<String>, template: Value) -> Option<Value> {
        let name = name.into();
        let previous = self.prototypes.write().insert(name.clone(), template);
        tracing::debug!(prototype = %name, replaced = previous.is_some(), "prototype registered");
        previous
    }

    /// Remove the template under `name`, returning it
    pub fn unregister(&self, name: &str) -> Option<Value> {
        let removed = self.prototypes.write().remove(name);
        tracing::debug!(prototype = name, removed = removed.is_some(), "prototype unregistered");
        removed
    }

    /// Fresh clone of the template under `name`, using the default strategy
    ///
    /// # Errors
    /// - [`RegistryError::PrototypeNotFound`] if nothing is registered
    /// - [`RegistryError::Clone`] if the template cannot be cloned
    pub fn stamp(&self, name: &str) -> Result<Value, RegistryError> {
        self.stamp_with(name, self.strategy.as_ref())
    }

    /// Fresh clone of the template under `name`, using `strategy`
    ///
    /// # Errors
    /// Same as [`stamp`](Self::stamp)
    pub fn stamp_with(
        &self,
        name: &str,
        strategy: &dyn CloneStrategy,
    ) -> Result<Value, RegistryError> {
        let prototypes = self.prototypes.read();
        let template = prototypes
            .get(name)
            .ok_or_else(|| RegistryError::PrototypeNotFound(name.to_string()))?;

        strategy.clone_value(template).map_err(|source| {
            tracing::warn!(prototype = name, strategy = strategy.name(), error = %source, "stamp failed");
            RegistryError::Clone {
                name: name.to_string(),
                source,
            }
        })
    }

    /// Check if a template is registered under `name`
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.prototypes.read().contains_key(name)
    }

    /// Registered names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.prototypes.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Number of registered templates
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.prototypes.read().len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prototypes.read().is_empty()
    }

    /// Strategy used by [`stamp`](Self::stamp)
    #[inline]
    #[must_use]
    pub fn strategy(&self) -> &dyn CloneStrategy {
        self.strategy.as_ref()
    }
}

impl Default for PrototypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PrototypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrototypeRegistry")
            .field("names", &self.names())
            .field("strategy", &self.strategy.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use replica_clone::{CloneError, StrategyKind};
    use replica_value::{deep_equal, same_topology, shares_nodes, Composite};

    fn template() -> Value {
        Composite::new("widget").with("size", 3).into()
    }

    #[test]
    fn registry_new_empty() {
        let registry = PrototypeRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert_eq!(registry.strategy().name(), "structural");
    }

    #[test]
    fn registry_register_and_contains() {
        let registry = PrototypeRegistry::new();
        assert!(registry.register("widget", template()).is_none());
        assert!(registry.contains("widget"));
        assert!(registry.register("widget", template()).is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn registry_stores_template_as_given() {
        let registry = PrototypeRegistry::new();
        let t = template();
        registry.register("widget", t.clone());
        let removed = registry.unregister("widget").unwrap();
        assert!(removed.as_node().unwrap().ptr_eq(t.as_node().unwrap()));
    }

    #[test]
    fn registry_stamp_returns_clone() {
        let registry = PrototypeRegistry::new();
        let t = template();
        registry.register("widget", t.clone());

        let stamped = registry.stamp("widget").unwrap();
        assert!(deep_equal(&stamped, &t));
        assert!(!shares_nodes(&stamped, &t));
    }

    #[test]
    fn registry_stamp_missing() {
        let registry = PrototypeRegistry::new();
        assert_eq!(
            registry.stamp("missing").unwrap_err(),
            RegistryError::PrototypeNotFound("missing".into())
        );
    }

    #[test]
    fn registry_unregister() {
        let registry = PrototypeRegistry::new();
        registry.register("widget", template());
        assert!(registry.unregister("widget").is_some());
        assert!(registry.unregister("widget").is_none());
        assert!(registry.stamp("widget").unwrap_err().is_not_found());
    }

    #[test]
    fn registry_names_sorted() {
        let registry =
            PrototypeRegistry::from_entries([("b", template()), ("a", template()), ("c", template())]);
        assert_eq!(registry.names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn registry_clone_failure_leaves_template() {
        let fd = Value::foreign(3_i32);
        let build = || -> Value {
            let inner = Composite::new("inner").with("n", 1);
            Composite::new("h").with("inner", inner).with("fd", fd.clone()).into()
        };
        let registry = PrototypeRegistry::new();
        let template = build();
        registry.register("handle", template.clone());

        let err = registry.stamp("handle").unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Clone {
                source: CloneError::UnsupportedFieldType { .. },
                ..
            }
        ));

        let stored = registry.unregister("handle").unwrap();
        assert!(stored.as_node().unwrap().ptr_eq(template.as_node().unwrap()));
        assert!(deep_equal(&stored, &build()));
        assert!(same_topology(&stored, &build()));
    }

    #[test]
    fn registry_with_config_uses_strategy() {
        let config = RegistryConfig::default().with_strategy(StrategyKind::Serialization);
        let registry = PrototypeRegistry::with_config(&config);
        assert_eq!(registry.strategy().name(), "serialization");
    }
}
