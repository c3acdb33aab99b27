//! Clone and codec errors

use std::fmt::{self, Display, Formatter};

/// Bounded resource that a clone operation can run out of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Distinct composite nodes visited
    Nodes,

    /// Nesting depth of the traversal
    Depth,
}

impl Display for Resource {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nodes => f.write_str("node"),
            Self::Depth => f.write_str("depth"),
        }
    }
}

/// Failure of a single clone call
///
/// Errors are local to the call that raised them: the source graph is never
/// modified and no partially built clone escapes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CloneError {
    /// A field holds a value with no cloning rule
    #[error("unsupported field type {type_name} at '{path}'")]
    UnsupportedFieldType {
        /// Dotted path of the offending value
        path: String,

        /// Rust type name of the host resource
        type_name: String,
    },

    /// The graph exceeded a configured ceiling
    #[error("{resource} limit of {limit} exceeded")]
    ResourceExhausted {
        /// Which ceiling was hit
        resource: Resource,

        /// Configured ceiling
        limit: usize,
    },

    /// The codec failed to encode the value
    #[error("{codec} encode failed: {message}")]
    EncodeError {
        /// Name of the codec
        codec: &'static str,

        /// Codec diagnostic
        message: String,
    },

    /// The codec failed to decode its own output
    #[error("{codec} decode failed: {message}")]
    DecodeError {
        /// Name of the codec
        codec: &'static str,

        /// Codec diagnostic
        message: String,
    },

    /// The codec met a cycle it has no representation for
    #[error("{codec} cannot represent the cycle closing at '{path}'")]
    CyclicStructureUnsupported {
        /// Name of the codec
        codec: &'static str,

        /// Dotted path of the offending value
        path: String,
    },
}

impl CloneError {
    /// Attach the codec name to a codec failure
    #[must_use]
    pub fn from_codec(codec: &'static str, err: CodecError) -> Self {
        match err {
            CodecError::Encode(message) => Self::EncodeError { codec, message },
            CodecError::Decode(message) => Self::DecodeError { codec, message },
            CodecError::CyclicStructure { path } => Self::CyclicStructureUnsupported { codec, path },
            CodecError::ResourceExhausted { resource, limit } => {
                Self::ResourceExhausted { resource, limit }
            }
        }
    }

    /// Whether the failure came from the codec round trip
    #[inline]
    #[must_use]
    pub fn is_codec_error(&self) -> bool {
        matches!(
            self,
            Self::EncodeError { .. } | Self::DecodeError { .. } | Self::CyclicStructureUnsupported { .. }
        )
    }
}

/// Failure reported by a [`Codec`](crate::Codec)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// Value could not be encoded
    #[error("encode failed: {0}")]
    Encode(String),

    /// Bytes could not be decoded
    #[error("decode failed: {0}")]
    Decode(String),

    /// Encoding reached a node already on the current path
    #[error("cycle closes at '{path}'")]
    CyclicStructure {
        /// Dotted path of the offending value
        path: String,
    },

    /// Encoding exceeded a configured ceiling
    #[error("{resource} limit of {limit} exceeded")]
    ResourceExhausted {
        /// Which ceiling was hit
        resource: Resource,

        /// Configured ceiling
        limit: usize,
    },
}

/// Invalid clone or registry configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML could not be parsed into the config type
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        /// Configuration key
        field: &'static str,

        /// Why the value was rejected
        reason: String,
    },
}
