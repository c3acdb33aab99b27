//! Replica Value Model
//!
//! Composite value graphs with identity, the raw material of the clone
//! engines and the prototype registry.
//!
//! # Core Concepts
//!
//! - [`Value`]: Closed variant over primitives, node references, ordered and
//!   unordered collections, and opaque host handles
//! - [`NodeRef`]: Shared handle to a [`Composite`] node with a stable [`NodeId`]
//! - [`FieldPath`]: Dotted addressing (`office.suite`, `phones.0`)
//! - [`deep_equal`] / [`same_topology`]: Cycle-safe graph comparison
//!
//! # Example
//!
//! ```rust
//! use replica_value::{deep_equal, Composite, FieldPath, Value};
//!
//! let office = Composite::new("address").with("city", "London");
//! let mut employee: Value = Composite::new("employee")
//!     .with("name", "John")
//!     .with("office", office)
//!     .into();
//!
//! let path: FieldPath = "office.city".parse().unwrap();
//! employee.assign(&path, Value::from("Paris")).unwrap();
//! assert_eq!(employee.lookup(&path).unwrap().as_text(), Some("Paris"));
//! assert!(deep_equal(&employee, &employee.clone()));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod access;
mod compare;
mod node;
mod path;
mod value;

// Re-exports
pub use compare::{deep_equal, reachable_nodes, same_topology, shares_nodes};
pub use node::{Composite, Field, NodeId, NodeRef, WeakNodeRef};
pub use path::{FieldPath, PathError};
pub use value::{ForeignHandle, Primitive, Value, ValueKind};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
