//! Replica Prototype Registry
//!
//! Named templates stamped into independent clones, plus a factory that
//! customises each stamped instance.
//!
//! # Core Concepts
//!
//! - [`PrototypeRegistry`]: Name → template map with single-writer /
//!   multiple-reader locking; `stamp` is lookup-and-clone in one step
//! - [`PrototypeFactory`]: Stamps a template and applies [`Overrides`]
//! - [`RegistryConfig`]: Default clone strategy and limits, loadable from TOML
//!
//! # Example
//!
//! ```rust
//! use replica_registry::{Overrides, PrototypeFactory, PrototypeRegistry};
//! use replica_value::{Composite, FieldPath};
//! use std::sync::Arc;
//!
//! let registry = PrototypeRegistry::new();
//! let office = Composite::new("address").with("city", "London").with("suite", 0);
//! registry.register("employee", Composite::new("employee").with("name", "").with("office", office).into());
//!
//! let factory = PrototypeFactory::new(Arc::new(registry));
//! let john = factory
//!     .create("employee", Overrides::new().set("name", "John")?.set("office.suite", 100)?)
//!     .unwrap();
//!
//! let suite: FieldPath = "office.suite".parse().unwrap();
//! assert_eq!(john.lookup(&suite).unwrap().as_int(), Some(100));
//! # Ok::<(), replica_registry::FactoryError>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod config;
mod error;
mod factory;
mod registry;

// Re-exports
pub use config::RegistryConfig;
pub use error::{FactoryError, RegistryError};
pub use factory::{Overrides, PrototypeFactory};
pub use registry::PrototypeRegistry;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
