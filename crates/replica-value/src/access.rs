//! Path-based reads and writes on value graphs
//!
//! Writes never hold a node lock while locking another node, so paths that
//! pass through a cycle back into an already visited node are safe.

use crate::node::NodeRef;
use crate::path::{parse_index, FieldPath, PathError};
use crate::value::Value;

impl Value {
    /// Handle copy of the value at `path`, if it resolves
    #[must_use]
    pub fn lookup(&self, path: &FieldPath) -> Option<Value> {
        let mut current = self.clone();
        for segment in path.iter() {
            current = match &current {
                Value::Node(node) => node.get(segment)?,
                Value::List(items) | Value::Bag(items) => {
                    items.get(parse_index(segment)?)?.clone()
                }
                Value::Primitive(_) | Value::Foreign(_) => return None,
            };
        }
        Some(current)
    }

    /// Replace the value at `path`, returning the previous value
    ///
    /// The target slot must already exist: a field on a node or an in-bounds
    /// index of a collection.
    ///
    /// # Errors
    /// Returns [`PathError`] describing the first segment that fails to resolve
    pub fn assign(&mut self, path: &FieldPath, value: Value) -> Result<Value, PathError> {
        let segments = path.segments();
        if segments.is_empty() {
            return Err(PathError::EmptyPath);
        }

        let mut slot = self;
        for (depth, segment) in segments.iter().enumerate() {
            let at = path.prefix(depth);
            match slot {
                Value::Node(node) => {
                    let node = node.clone();
                    return assign_in_node(&node, path, depth, value);
                }
                Value::List(items) | Value::Bag(items) => {
                    let index = collection_index(items.len(), segment, &at)?;
                    slot = &mut items[index];
                }
                other => {
                    return Err(PathError::NotAContainer {
                        at,
                        kind: other.kind().as_str(),
                    })
                }
            }
        }
        Ok(std::mem::replace(slot, value))
    }
}

/// Validate `segment` as an index into a collection of `len` items
fn collection_index(len: usize, segment: &str, at: &FieldPath) -> Result<usize, PathError> {
    let index = parse_index(segment).ok_or_else(|| PathError::NotAnIndex {
        at: at.clone(),
        segment: segment.to_string(),
    })?;
    if index >= len {
        return Err(PathError::IndexOutOfBounds {
            at: at.clone(),
            index,
            len,
        });
    }
    Ok(index)
}

/// Assign `path[start..]` relative to `node`
///
/// First finds the innermost node that owns the target slot (hopping across
/// node references without holding locks), then rewrites the slot under a
/// single write lock.
fn assign_in_node(
    node: &NodeRef,
    path: &FieldPath,
    start: usize,
    value: Value,
) -> Result<Value, PathError> {
    let segments = path.segments();
    let (owner, start) = locate_owner(node, path, start)?;

    let mut body = owner.write();
    let field = body
        .field_mut(&segments[start])
        .ok_or_else(|| PathError::MissingField {
            at: path.prefix(start),
            field: segments[start].clone(),
        })?;

    let mut slot = &mut field.value;
    for (offset, segment) in segments[start + 1..].iter().enumerate() {
        let at = path.prefix(start + 1 + offset);
        slot = match slot {
            Value::List(items) | Value::Bag(items) => {
                let index = collection_index(items.len(), segment, &at)?;
                &mut items[index]
            }
            // The owner changed shape since it was located.
            other => {
                return Err(PathError::NotAContainer {
                    at,
                    kind: other.kind().as_str(),
                })
            }
        };
    }
    Ok(std::mem::replace(slot, value))
}

/// Walk from `node` to the node whose field directly holds the target slot
fn locate_owner(
    node: &NodeRef,
    path: &FieldPath,
    start: usize,
) -> Result<(NodeRef, usize), PathError> {
    let segments = path.segments();
    let mut owner = node.clone();
    let mut start = start;

    'owners: loop {
        let body = owner.read();
        let field = body
            .field(&segments[start])
            .ok_or_else(|| PathError::MissingField {
                at: path.prefix(start),
                field: segments[start].clone(),
            })?;

        let mut current = &field.value;
        let mut depth = start + 1;
        while depth < segments.len() {
            let at = path.prefix(depth);
            match current {
                Value::Node(child) => {
                    let child = child.clone();
                    drop(body);
                    owner = child;
                    start = depth;
                    continue 'owners;
                }
                Value::List(items) | Value::Bag(items) => {
                    let index = collection_index(items.len(), &segments[depth], &at)?;
                    current = &items[index];
                    depth += 1;
                }
                other => {
                    return Err(PathError::NotAContainer {
                        at,
                        kind: other.kind().as_str(),
                    })
                }
            }
        }
        drop(body);
        return Ok((owner, start));
    }
}
