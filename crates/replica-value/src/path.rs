//! Field paths for addressing inside a value graph
//!
//! Provides [`FieldPath`] for dotted addressing of fields and list slots.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Path from a root value to one of its reachable slots
///
/// Each segment is either a field name (when the current value is a node)
/// or a decimal index (when the current value is a list or bag).
///
/// # Examples
/// - `["office", "suite"]` → `office.suite`
/// - `["phones", "0"]` → `phones.0`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// Create new path from segments
    #[inline]
    #[must_use]
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Create path from a single segment
    #[inline]
    #[must_use]
    pub fn single(segment: impl Into<String>) -> Self {
        Self(vec![segment.into()])
    }

    /// Empty path (the root value itself)
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Get number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if path is empty (root)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Prefix of the first `len` segments
    #[inline]
    #[must_use]
    pub fn prefix(&self, len: usize) -> Self {
        Self(self.0[..len.min(self.0.len())].to_vec())
    }

    /// Iterator over segments from root to leaf
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Interpret a segment as a list index
#[inline]
pub(crate) fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        write!(f, "{}", self.0.join("."))
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }

        let segments: Vec<String> = s
            .split('.')
            .map(|seg| {
                if seg.is_empty() {
                    Err(PathError::EmptySegment)
                } else if seg.contains(|c: char| !c.is_alphanumeric() && c != '_') {
                    Err(PathError::InvalidSegment(seg.to_string()))
                } else {
                    Ok(seg.to_string())
                }
            })
            .collect::<Result<_, _>>()?;

        Ok(Self(segments))
    }
}

/// Errors raised while parsing or resolving a field path
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Empty segment in path
    #[error("path contains empty segment")]
    EmptySegment,

    /// Invalid segment characters
    #[error("invalid segment: {0} (must be alphanumeric or underscore)")]
    InvalidSegment(String),

    /// The root itself cannot be the target of an assignment
    #[error("path is empty")]
    EmptyPath,

    /// Named field does not exist on the node
    #[error("no field '{field}' on node at '{at}'")]
    MissingField {
        /// Path of the value where resolution stopped
        at: FieldPath,

        /// Field name that was looked up
        field: String,
    },

    /// Segment used on a collection is not a valid index
    #[error("segment '{segment}' at '{at}' is not a collection index")]
    NotAnIndex {
        /// Path of the value where resolution stopped
        at: FieldPath,

        /// Offending segment
        segment: String,
    },

    /// Index outside the collection bounds
    #[error("index {index} out of bounds at '{at}' (len {len})")]
    IndexOutOfBounds {
        /// Path of the value where resolution stopped
        at: FieldPath,

        /// Requested index
        index: usize,

        /// Collection length
        len: usize,
    },

    /// Value at the path is a leaf and cannot be descended into
    #[error("cannot descend into {kind} at '{at}'")]
    NotAContainer {
        /// Path of the value where resolution stopped
        at: FieldPath,

        /// Kind of the leaf value
        kind: &'static str,
    },
}
