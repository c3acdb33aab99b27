//! Replica Clone Engines
//!
//! Deep cloning of value graphs through two interchangeable strategies.
//!
//! # Core Concepts
//!
//! - [`CloneStrategy`]: Core trait for deep clone strategies
//! - [`StructuralCloner`]: Node-by-node rebuild; keeps shared references
//!   shared and reproduces cycles via a per-call [`CycleGuard`]
//! - [`SerializationCloner`]: `decode(encode(v))` through a [`Codec`];
//!   duplicates shared references and rejects cycles
//! - [`CloneConfig`]: Resource ceilings and dropped-field policy
//!
//! For acyclic graphs without transient fields both strategies produce
//! deep-equal results. They diverge on sharing (structural keeps it,
//! serialization duplicates) and on cycles (structural reproduces them,
//! serialization fails with [`CloneError::CyclicStructureUnsupported`]).
//!
//! # Example
//!
//! ```rust
//! use replica_clone::{CloneStrategy, StructuralCloner};
//! use replica_value::{deep_equal, Composite, Value};
//!
//! let original: Value = Composite::new("point").with("x", 1).with("y", 2).into();
//! let copy = StructuralCloner::new().clone_value(&original).unwrap();
//!
//! assert!(deep_equal(&original, &copy));
//! copy.as_node().unwrap().set("x", 10);
//! assert_eq!(original.as_node().unwrap().get("x").unwrap().as_int(), Some(1));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod codec;
mod config;
mod error;
mod guard;
mod serialization;
mod strategy;
mod structural;

// Re-exports
pub use codec::{Codec, JsonCodec};
pub use config::{CloneConfig, DroppedFieldPolicy, DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES};
pub use error::{CloneError, CodecError, ConfigError, Resource};
pub use guard::CycleGuard;
pub use serialization::SerializationCloner;
pub use strategy::{CloneStrategy, Fidelity, StrategyKind};
pub use structural::StructuralCloner;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
