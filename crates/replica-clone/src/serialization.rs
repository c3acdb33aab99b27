//! Serialization clone engine
//!
//! Clones by `decode(encode(root))`. The result is only as faithful as the
//! codec: with [`JsonCodec`](crate::JsonCodec) shared references come back
//! duplicated, cycles are rejected, and transient fields are dropped (or
//! rejected, per [`DroppedFieldPolicy`](crate::DroppedFieldPolicy)).
//! Use it when a clone must be fully detached from in-memory sharing.

use crate::codec::{Codec, JsonCodec};
use crate::error::CloneError;
use crate::strategy::{CloneStrategy, Fidelity};
use replica_value::Value;

/// Deep clone through a codec round trip
#[derive(Debug, Clone, Default)]
pub struct SerializationCloner<C: Codec = JsonCodec> {
    codec: C,
}

impl<C: Codec> SerializationCloner<C> {
    /// Cloner using `codec`
    #[inline]
    #[must_use]
    pub fn new(codec: C) -> Self {
        Self { codec }
    }

    /// Underlying codec
    #[inline]
    #[must_use]
    pub fn codec(&self) -> &C {
        &self.codec
    }
}

impl<C: Codec> CloneStrategy for SerializationCloner<C> {
    fn clone_value(&self, root: &Value) -> Result<Value, CloneError> {
        let name = self.codec.name();
        let bytes = self
            .codec
            .encode(root)
            .map_err(|e| CloneError::from_codec(name, e))?;
        let copy = self
            .codec
            .decode(&bytes)
            .map_err(|e| CloneError::from_codec(name, e))?;
        tracing::debug!(codec = name, bytes = bytes.len(), "serialization clone complete");
        Ok(copy)
    }

    fn fidelity(&self) -> Fidelity {
        Fidelity::Tree
    }

    fn name(&self) -> &'static str {
        "serialization"
    }
}
