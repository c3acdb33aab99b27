//! Composite nodes with stable identity
//!
//! Provides [`Composite`], [`Field`], [`NodeRef`] and [`NodeId`].

use crate::value::Value;
use indexmap::IndexMap;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::{Arc, Weak};

/// Identity of a composite node
///
/// Derived from the node's allocation; stable for as long as any handle to
/// the node is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{:x}", self.0)
    }
}

/// One named slot of a composite node
#[derive(Debug, Clone, Default)]
pub struct Field {
    /// Stored value
    pub value: Value,

    /// Excluded from serialization; codecs never see it
    pub transient: bool,
}

impl Field {
    /// Regular field
    #[inline]
    #[must_use]
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            transient: false,
        }
    }

    /// Field invisible to codecs
    #[inline]
    #[must_use]
    pub fn transient(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            transient: true,
        }
    }
}

/// Body of a composite node: a shape tag plus ordered named fields
#[derive(Debug, Clone, Default)]
pub struct Composite {
    type_name: String,
    fields: IndexMap<String, Field>,
}

impl Composite {
    /// Empty node of the given shape
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Empty node with room for `capacity` fields
    #[must_use]
    pub fn with_capacity(type_name: impl Into<String>, capacity: usize) -> Self {
        Self {
            type_name: type_name.into(),
            fields: IndexMap::with_capacity(capacity),
        }
    }

    /// Builder: add a regular field
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), Field::new(value));
        self
    }

    /// Builder: add a transient field
    #[must_use]
    pub fn with_transient(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), Field::transient(value));
        self
    }

    /// Shape tag
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Field by name
    #[inline]
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Mutable field by name
    #[inline]
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.get_mut(name)
    }

    /// Field value by name
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).map(|f| &f.value)
    }

    /// Set a field value, returning the previous one
    ///
    /// An existing field keeps its transient flag; a new field is regular.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let name = name.into();
        match self.fields.get_mut(&name) {
            Some(field) => Some(std::mem::replace(&mut field.value, value.into())),
            None => {
                self.fields.insert(name, Field::new(value));
                None
            }
        }
    }

    /// Insert a field with explicit flags, replacing any existing one
    pub fn insert_field(&mut self, name: impl Into<String>, field: Field) -> Option<Field> {
        self.fields.insert(name.into(), field)
    }

    /// Remove a field, preserving the order of the others
    pub fn remove(&mut self, name: &str) -> Option<Field> {
        self.fields.shift_remove(name)
    }

    /// Drop every field
    #[inline]
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Fields in declaration order
    #[inline]
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Field)> {
        self.fields.iter()
    }

    /// Number of fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check for no fields
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Shared handle to a composite node
///
/// Cloning the handle shares the node. Nodes referenced from a cycle keep
/// each other alive; call [`NodeRef::detach`] on one of them to release the
/// cycle.
#[derive(Clone)]
pub struct NodeRef(Arc<RwLock<Composite>>);

impl NodeRef {
    /// Allocate a node
    #[must_use]
    pub fn new(composite: Composite) -> Self {
        Self(Arc::new(RwLock::new(composite)))
    }

    /// Identity of the node
    #[inline]
    #[must_use]
    pub fn id(&self) -> NodeId {
        NodeId(Arc::as_ptr(&self.0).cast::<()>() as usize)
    }

    /// Whether both handles point at the same node
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Shared read access
    #[inline]
    pub fn read(&self) -> RwLockReadGuard<'_, Composite> {
        self.0.read()
    }

    /// Exclusive write access
    #[inline]
    pub fn write(&self) -> RwLockWriteGuard<'_, Composite> {
        self.0.write()
    }

    /// Shallow copy of the node body (child nodes are shared)
    #[must_use]
    pub fn snapshot(&self) -> Composite {
        self.0.read().clone()
    }

    /// Handle copy of a field value
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.0.read().get(name).cloned()
    }

    /// Set a field value, returning the previous one
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.write().set(name, value)
    }

    /// Shape tag of the node
    #[must_use]
    pub fn type_name(&self) -> String {
        self.0.read().type_name().to_string()
    }

    /// Drop all fields, breaking any cycle that runs through this node
    pub fn detach(&self) {
        self.0.write().clear();
    }

    /// Non-owning handle to the node
    #[inline]
    #[must_use]
    pub fn downgrade(&self) -> WeakNodeRef {
        WeakNodeRef(Arc::downgrade(&self.0))
    }
}

/// Handle that does not keep its node alive
#[derive(Clone)]
pub struct WeakNodeRef(Weak<RwLock<Composite>>);

impl WeakNodeRef {
    /// Strong handle, if the node is still alive
    #[inline]
    #[must_use]
    pub fn upgrade(&self) -> Option<NodeRef> {
        self.0.upgrade().map(NodeRef)
    }
}

impl Debug for WeakNodeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let state = if self.0.strong_count() > 0 { "live" } else { "dropped" };
        write!(f, "WeakNodeRef({state})")
    }
}

impl Debug for NodeRef {
    // Never descends: nodes may form cycles.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0.try_read() {
            Some(body) => write!(f, "NodeRef({} {})", self.id(), body.type_name()),
            None => write!(f, "NodeRef({} <locked>)", self.id()),
        }
    }
}
