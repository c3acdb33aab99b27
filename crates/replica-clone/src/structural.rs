//! Structural clone engine
//!
//! Depth-first rebuild of a value graph. Each source node is allocated a
//! copy and recorded in the [`CycleGuard`] *before* its fields are visited,
//! so a reference back to a node still being copied resolves to that copy.
//! This single rule reproduces both cycles and shared references.

use crate::config::CloneConfig;
use crate::error::{CloneError, Resource};
use crate::guard::CycleGuard;
use crate::strategy::{CloneStrategy, Fidelity};
use replica_value::{Composite, Field, FieldPath, NodeRef, Value};

/// Node-by-node deep clone with cycle and sharing fidelity
#[derive(Debug, Clone, Default)]
pub struct StructuralCloner {
    config: CloneConfig,
}

impl StructuralCloner {
    /// Cloner with default limits
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cloner with explicit limits
    #[inline]
    #[must_use]
    pub fn with_config(config: CloneConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CloneConfig {
        &self.config
    }
}

impl CloneStrategy for StructuralCloner {
    fn clone_value(&self, root: &Value) -> Result<Value, CloneError> {
        let mut pass = Pass::new(&self.config);
        let result = pass.value(root, 0);
        pass.finish(result)
    }

    fn fidelity(&self) -> Fidelity {
        Fidelity::Graph
    }

    fn name(&self) -> &'static str {
        "structural"
    }
}

/// State of one clone call
struct Pass {
    guard: CycleGuard,
    max_depth: usize,
    path: Vec<String>,
}

impl Pass {
    fn new(config: &CloneConfig) -> Self {
        Self {
            guard: CycleGuard::new(config.max_nodes),
            max_depth: config.max_depth,
            path: Vec::new(),
        }
    }

    /// Close the pass; a failed pass tears down the clones it built
    fn finish(self, result: Result<Value, CloneError>) -> Result<Value, CloneError> {
        match result {
            Ok(copy) => {
                tracing::debug!(nodes = self.guard.len(), "structural clone complete");
                Ok(copy)
            }
            Err(err) => {
                self.guard.discard();
                Err(err)
            }
        }
    }

    fn value(&mut self, value: &Value, depth: usize) -> Result<Value, CloneError> {
        if depth > self.max_depth {
            return Err(CloneError::ResourceExhausted {
                resource: Resource::Depth,
                limit: self.max_depth,
            });
        }
        match value {
            Value::Primitive(p) => Ok(Value::Primitive(p.clone())),
            Value::Node(node) => self.node(node, depth).map(Value::Node),
            Value::List(items) => self.items(items, depth).map(Value::List),
            Value::Bag(items) => self.items(items, depth).map(Value::Bag),
            Value::Foreign(handle) => Err(CloneError::UnsupportedFieldType {
                path: FieldPath::new(self.path.clone()).to_string(),
                type_name: handle.type_name().to_string(),
            }),
        }
    }

    fn items(&mut self, items: &[Value], depth: usize) -> Result<Vec<Value>, CloneError> {
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            self.path.push(i.to_string());
            let copy = self.value(item, depth + 1);
            self.path.pop();
            out.push(copy?);
        }
        Ok(out)
    }

    fn node(&mut self, source: &NodeRef, depth: usize) -> Result<NodeRef, CloneError> {
        if let Some(existing) = self.guard.resolve(source) {
            return Ok(existing);
        }

        // Snapshot so no lock is held while descending.
        let body = source.snapshot();
        let copy = NodeRef::new(Composite::new(body.type_name()));
        self.guard.record(source, copy.clone())?;

        let mut rebuilt = Composite::with_capacity(body.type_name(), body.len());
        for (name, field) in body.fields() {
            self.path.push(name.clone());
            let value = self.value(&field.value, depth + 1);
            self.path.pop();
            rebuilt.insert_field(
                name.clone(),
                Field {
                    value: value?,
                    transient: field.transient,
                },
            );
        }
        *copy.write() = rebuilt;
        Ok(copy)
    }
}
