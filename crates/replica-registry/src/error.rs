//! Registry and factory errors

use replica_clone::CloneError;
use replica_value::{FieldPath, PathError};

/// Registry operation failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// No prototype registered under the name
    #[error("prototype not found: {0}")]
    PrototypeNotFound(String),

    /// Cloning the template failed; the registry is unchanged
    #[error("cloning prototype '{name}' failed: {source}")]
    Clone {
        /// Prototype being stamped
        name: String,

        /// Underlying clone failure
        #[source]
        source: CloneError,
    },
}

impl RegistryError {
    /// Check if the error is a registry miss
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PrototypeNotFound(_))
    }
}

/// Factory operation failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FactoryError {
    /// Stamping the prototype failed
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// An override targets a field the prototype's shape does not have
    #[error("invalid field path '{path}': {reason}")]
    InvalidFieldPath {
        /// Override path as given
        path: FieldPath,

        /// Why it did not resolve
        #[source]
        reason: PathError,
    },
}

impl FactoryError {
    /// Check if the error is a registry miss
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Registry(e) if e.is_not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_propagates_through_factory() {
        let err: FactoryError = RegistryError::PrototypeNotFound("employee".into()).into();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "prototype not found: employee");
    }

    #[test]
    fn invalid_path_display() {
        let err = FactoryError::InvalidFieldPath {
            path: "office.floor".parse().unwrap(),
            reason: PathError::EmptyPath,
        };
        assert!(!err.is_not_found());
        assert!(err.to_string().starts_with("invalid field path 'office.floor'"));
    }
}
