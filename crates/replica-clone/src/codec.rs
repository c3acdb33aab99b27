//! Codec collaborator for the serialization strategy
//!
//! Provides the [`Codec`] trait and [`JsonCodec`], a `serde_json` codec that
//! writes value graphs as plain trees. It has no reference table: a node
//! reached twice is written twice, and a node reached again while it is
//! still being written (a cycle) is an error.

use crate::config::{CloneConfig, DroppedFieldPolicy};
use crate::error::{CodecError, Resource};
use indexmap::IndexMap;
use replica_value::{Composite, Field, FieldPath, NodeId, NodeRef, Primitive, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Byte codec for value graphs
///
/// # Contract
/// - `encode` is deterministic for equal inputs
/// - `decode(encode(v))` builds a fresh graph every call
/// - Encode and decode failures are distinguishable
pub trait Codec: Send + Sync + std::fmt::Debug {
    /// Serialize `value` to bytes
    ///
    /// # Errors
    /// Returns [`CodecError`] if the value has no faithful encoding
    fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError>;

    /// Rebuild a value from bytes
    ///
    /// # Errors
    /// Returns [`CodecError::Decode`] if the bytes are not a valid encoding
    fn decode(&self, bytes: &[u8]) -> Result<Value, CodecError>;

    /// Codec name (for diagnostics)
    fn name(&self) -> &'static str;
}

/// Tree-shaped wire form
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Wire {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Node {
        #[serde(rename = "type")]
        type_name: String,
        fields: IndexMap<String, Wire>,
    },
    List(Vec<Wire>),
    Bag(Vec<Wire>),
}

/// JSON codec without reference tracking
#[derive(Debug, Clone, Default)]
pub struct JsonCodec {
    config: CloneConfig,
}

impl JsonCodec {
    /// Codec with default limits
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Codec with explicit limits and dropped-field policy
    #[inline]
    #[must_use]
    pub fn with_config(config: CloneConfig) -> Self {
        Self { config }
    }

    /// Longest chain of nested JSON containers the decoder will accept
    ///
    /// Every value level costs at most three JSON levels (variant object,
    /// node object, field map).
    fn max_json_depth(&self) -> usize {
        self.config.max_depth.saturating_mul(3).saturating_add(3)
    }
}

impl Codec for JsonCodec {
    fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
        let mut encoder = Encoder {
            config: &self.config,
            on_path: HashSet::new(),
            path: Vec::new(),
            nodes: 0,
            dropped: 0,
        };
        let wire = encoder.value(value, 0)?;
        if encoder.dropped > 0 {
            tracing::warn!(
                dropped = encoder.dropped,
                "transient fields left out of serialized clone"
            );
        }
        serde_json::to_vec(&wire).map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value, CodecError> {
        let depth = json_nesting(bytes);
        let limit = self.max_json_depth();
        if depth > limit {
            return Err(CodecError::Decode(format!(
                "nesting depth {depth} exceeds {limit}"
            )));
        }

        let mut de = serde_json::Deserializer::from_slice(bytes);
        de.disable_recursion_limit();
        let wire = Wire::deserialize(&mut de).map_err(|e| CodecError::Decode(e.to_string()))?;
        de.end().map_err(|e| CodecError::Decode(e.to_string()))?;
        Ok(rebuild(wire))
    }

    fn name(&self) -> &'static str {
        "json"
    }
}

/// Value → wire conversion state
struct Encoder<'a> {
    config: &'a CloneConfig,
    /// Nodes on the current descent path; meeting one again is a cycle
    on_path: HashSet<NodeId>,
    path: Vec<String>,
    /// Nodes written, counting duplicates of shared nodes
    nodes: usize,
    dropped: usize,
}

impl Encoder<'_> {
    fn here(&self) -> String {
        FieldPath::new(self.path.clone()).to_string()
    }

    fn value(&mut self, value: &Value, depth: usize) -> Result<Wire, CodecError> {
        if depth > self.config.max_depth {
            return Err(CodecError::ResourceExhausted {
                resource: Resource::Depth,
                limit: self.config.max_depth,
            });
        }
        match value {
            Value::Primitive(p) => self.primitive(p),
            Value::Node(node) => self.node(node, depth),
            Value::List(items) => self.items(items, depth).map(Wire::List),
            Value::Bag(items) => self.items(items, depth).map(Wire::Bag),
            Value::Foreign(handle) => Err(CodecError::Encode(format!(
                "foreign handle {} at '{}' has no serialized form",
                handle.type_name(),
                self.here()
            ))),
        }
    }

    fn primitive(&self, p: &Primitive) -> Result<Wire, CodecError> {
        Ok(match p {
            Primitive::Null => Wire::Null,
            Primitive::Bool(b) => Wire::Bool(*b),
            Primitive::Int(i) => Wire::Int(*i),
            Primitive::Float(x) if !x.is_finite() => {
                return Err(CodecError::Encode(format!(
                    "non-finite float {x} at '{}'",
                    self.here()
                )))
            }
            Primitive::Float(x) => Wire::Float(*x),
            Primitive::Text(s) => Wire::Text(s.clone()),
            Primitive::Bytes(b) => Wire::Bytes(b.clone()),
        })
    }

    fn items(&mut self, items: &[Value], depth: usize) -> Result<Vec<Wire>, CodecError> {
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            self.path.push(i.to_string());
            let wire = self.value(item, depth + 1);
            self.path.pop();
            out.push(wire?);
        }
        Ok(out)
    }

    fn node(&mut self, node: &NodeRef, depth: usize) -> Result<Wire, CodecError> {
        let id = node.id();
        if self.on_path.contains(&id) {
            return Err(CodecError::CyclicStructure { path: self.here() });
        }
        self.nodes += 1;
        if self.nodes > self.config.max_nodes {
            return Err(CodecError::ResourceExhausted {
                resource: Resource::Nodes,
                limit: self.config.max_nodes,
            });
        }

        let body = node.snapshot();
        self.on_path.insert(id);
        let mut fields = IndexMap::with_capacity(body.len());
        for (name, field) in body.fields() {
            if field.transient {
                match self.config.dropped_fields {
                    DroppedFieldPolicy::Drop => {
                        self.dropped += 1;
                        continue;
                    }
                    DroppedFieldPolicy::Fail => {
                        return Err(CodecError::Encode(format!(
                            "transient field '{name}' at '{}' would be dropped",
                            self.here()
                        )));
                    }
                }
            }
            self.path.push(name.clone());
            let wire = self.value(&field.value, depth + 1);
            self.path.pop();
            fields.insert(name.clone(), wire?);
        }
        self.on_path.remove(&id);

        Ok(Wire::Node {
            type_name: body.type_name().to_string(),
            fields,
        })
    }
}

/// Wire → value conversion; every node is freshly allocated
fn rebuild(wire: Wire) -> Value {
    match wire {
        Wire::Null => Value::null(),
        Wire::Bool(b) => Value::from(b),
        Wire::Int(i) => Value::from(i),
        Wire::Float(x) => Value::from(x),
        Wire::Text(s) => Value::from(s),
        Wire::Bytes(b) => Value::from(b),
        Wire::Node { type_name, fields } => {
            let mut body = Composite::with_capacity(type_name, fields.len());
            for (name, field) in fields {
                body.insert_field(name, Field::new(rebuild(field)));
            }
            Value::Node(NodeRef::new(body))
        }
        Wire::List(items) => Value::List(items.into_iter().map(rebuild).collect()),
        Wire::Bag(items) => Value::Bag(items.into_iter().map(rebuild).collect()),
    }
}

/// Maximum `{`/`[` nesting of a JSON document, ignoring string contents
fn json_nesting(bytes: &[u8]) -> usize {
    let (mut depth, mut max) = (0usize, 0usize);
    let (mut in_string, mut escaped) = (false, false);
    for &b in bytes {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                max = max.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max
}
