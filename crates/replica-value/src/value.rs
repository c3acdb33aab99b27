//! The closed value variant every clone engine dispatches on
//!
//! Provides [`Value`], [`Primitive`] and [`ForeignHandle`].

use crate::node::{Composite, NodeRef};
use std::any::Any;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// Identity-free leaf data, copied by value
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Absent value / null reference
    Null,

    /// Boolean
    Bool(bool),

    /// Signed integer
    Int(i64),

    /// Floating point
    Float(f64),

    /// UTF-8 text
    Text(String),

    /// Raw bytes
    Bytes(Vec<u8>),
}

/// Opaque host resource (file, socket, compiled script...)
///
/// Foreign handles have no cloning rule: the structural engine rejects them
/// and codecs have no serialized form for them.
#[derive(Clone)]
pub struct ForeignHandle {
    type_name: &'static str,
    inner: Arc<dyn Any + Send + Sync>,
}

impl ForeignHandle {
    /// Wrap a host resource
    #[must_use]
    pub fn new<T: Any + Send + Sync>(resource: T) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            inner: Arc::new(resource),
        }
    }

    /// Rust type name of the wrapped resource
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Borrow the resource as `T`
    #[inline]
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Whether both handles wrap the same resource
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Debug for ForeignHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "ForeignHandle({})", self.type_name)
    }
}

/// Any datum a clone engine can be asked to copy
///
/// The variant set is closed so that every engine handles all shapes
/// exhaustively. `Clone` on a `Value` is a handle copy: nodes reached through
/// it are shared, not duplicated. Use a clone strategy for deep copies.
#[derive(Debug, Clone)]
pub enum Value {
    /// Leaf data without identity
    Primitive(Primitive),

    /// Reference to a composite node with identity
    Node(NodeRef),

    /// Ordered collection
    List(Vec<Value>),

    /// Unordered collection; compared as a multiset
    Bag(Vec<Value>),

    /// Host resource with no cloning rule
    Foreign(ForeignHandle),
}

/// Coarse shape of a [`Value`], used in diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// [`Value::Primitive`]
    Primitive,
    /// [`Value::Node`]
    Node,
    /// [`Value::List`]
    List,
    /// [`Value::Bag`]
    Bag,
    /// [`Value::Foreign`]
    Foreign,
}

impl ValueKind {
    /// Lowercase name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primitive => "primitive",
            Self::Node => "node",
            Self::List => "list",
            Self::Bag => "bag",
            Self::Foreign => "foreign handle",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    /// The null value
    #[inline]
    #[must_use]
    pub fn null() -> Self {
        Self::Primitive(Primitive::Null)
    }

    /// Ordered collection from values
    #[must_use]
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Unordered collection from values
    #[must_use]
    pub fn bag<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::Bag(items.into_iter().map(Into::into).collect())
    }

    /// Wrap a host resource
    #[must_use]
    pub fn foreign<T: std::any::Any + Send + Sync>(resource: T) -> Self {
        Self::Foreign(ForeignHandle::new(resource))
    }

    /// Shape of this value
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Primitive(_) => ValueKind::Primitive,
            Self::Node(_) => ValueKind::Node,
            Self::List(_) => ValueKind::List,
            Self::Bag(_) => ValueKind::Bag,
            Self::Foreign(_) => ValueKind::Foreign,
        }
    }

    /// Check for null
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Primitive(Primitive::Null))
    }

    /// Node handle, if this is a node
    #[inline]
    #[must_use]
    pub fn as_node(&self) -> Option<&NodeRef> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Integer payload
    #[inline]
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Primitive(Primitive::Int(i)) => Some(*i),
            _ => None,
        }
    }

    /// Float payload
    #[inline]
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Primitive(Primitive::Float(x)) => Some(*x),
            _ => None,
        }
    }

    /// Boolean payload
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Primitive(Primitive::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Text payload
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Primitive(Primitive::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Elements of a list or bag
    #[inline]
    #[must_use]
    pub fn as_items(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) | Self::Bag(items) => Some(items),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::null()
    }
}

impl From<Primitive> for Value {
    fn from(p: Primitive) -> Self {
        Self::Primitive(p)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Primitive(Primitive::Bool(b))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Primitive(Primitive::Int(i))
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Primitive(Primitive::Int(i64::from(i)))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Primitive(Primitive::Float(x))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Primitive(Primitive::Text(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Primitive(Primitive::Text(s))
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Primitive(Primitive::Bytes(bytes))
    }
}

impl From<NodeRef> for Value {
    fn from(node: NodeRef) -> Self {
        Self::Node(node)
    }
}

impl From<&NodeRef> for Value {
    fn from(node: &NodeRef) -> Self {
        Self::Node(node.clone())
    }
}

impl From<Composite> for Value {
    fn from(composite: Composite) -> Self {
        Self::Node(NodeRef::new(composite))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or_else(Self::null, Into::into)
    }
}
