//! Graph comparison
//!
//! - [`deep_equal`]: field-by-field equality, identity ignored
//! - [`same_topology`]: deep equality plus a consistent one-to-one mapping
//!   between node identities (shared references and cycles must line up)
//! - [`shares_nodes`]: whether two graphs have any node in common
//!
//! All three terminate on cyclic graphs. Node bodies are snapshotted under a
//! short read lock; no lock is held while recursing.

use crate::node::{NodeId, NodeRef};
use crate::value::{Primitive, Value};
use std::collections::{HashMap, HashSet};

/// Deep equality that ignores node identity
///
/// Two nodes are equal when they have the same shape tag and the same fields
/// (name, transient flag and value). Bags compare as multisets.
#[must_use]
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    Comparer::new(Mode::Values).values(a, b)
}

/// Deep equality that also requires isomorphic sharing
///
/// Every node in `a` must correspond to exactly one node in `b` and vice
/// versa, so two fields sharing a node in `a` must share a node in `b`, and
/// cycles must close at the same place.
#[must_use]
pub fn same_topology(a: &Value, b: &Value) -> bool {
    Comparer::new(Mode::Topology).values(a, b)
}

/// Identities of every node reachable from `root`
#[must_use]
pub fn reachable_nodes(root: &Value) -> HashSet<NodeId> {
    let mut seen = HashSet::new();
    let mut stack = vec![root.clone()];
    while let Some(value) = stack.pop() {
        match value {
            Value::Node(node) => {
                if seen.insert(node.id()) {
                    let body = node.snapshot();
                    stack.extend(body.fields().map(|(_, f)| f.value.clone()));
                }
            }
            Value::List(items) | Value::Bag(items) => stack.extend(items),
            Value::Primitive(_) | Value::Foreign(_) => {}
        }
    }
    seen
}

/// Whether any node reachable from `a` is also reachable from `b`
#[must_use]
pub fn shares_nodes(a: &Value, b: &Value) -> bool {
    let left = reachable_nodes(a);
    if left.is_empty() {
        return false;
    }
    reachable_nodes(b).iter().any(|id| left.contains(id))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Values,
    Topology,
}

/// Co-inductive comparison state
///
/// A node pair under comparison is assumed equal while its fields are being
/// checked; that assumption is what makes cycles terminate.
#[derive(Debug, Clone)]
struct Comparer {
    mode: Mode,
    assumed: HashSet<(NodeId, NodeId)>,
    forward: HashMap<NodeId, NodeId>,
    backward: HashMap<NodeId, NodeId>,
}

impl Comparer {
    fn new(mode: Mode) -> Self {
        Self {
            mode,
            assumed: HashSet::new(),
            forward: HashMap::new(),
            backward: HashMap::new(),
        }
    }

    fn values(&mut self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Primitive(x), Value::Primitive(y)) => primitives(x, y),
            (Value::Node(x), Value::Node(y)) => self.nodes(x, y),
            (Value::List(xs), Value::List(ys)) => {
                xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| self.values(x, y))
            }
            (Value::Bag(xs), Value::Bag(ys)) => self.bags(xs, ys),
            (Value::Foreign(x), Value::Foreign(y)) => x.ptr_eq(y),
            _ => false,
        }
    }

    fn nodes(&mut self, x: &NodeRef, y: &NodeRef) -> bool {
        let (xid, yid) = (x.id(), y.id());
        match self.mode {
            Mode::Values => {
                if x.ptr_eq(y) || !self.assumed.insert((xid, yid)) {
                    return true;
                }
            }
            Mode::Topology => match (
                self.forward.get(&xid).copied(),
                self.backward.get(&yid).copied(),
            ) {
                (Some(mapped), _) if mapped != yid => return false,
                (_, Some(mapped)) if mapped != xid => return false,
                (Some(_), Some(_)) => return true,
                _ => {
                    self.forward.insert(xid, yid);
                    self.backward.insert(yid, xid);
                }
            },
        }

        let left = x.snapshot();
        let right = y.snapshot();
        if left.type_name() != right.type_name() || left.len() != right.len() {
            return false;
        }
        let equal = left.fields().all(|(name, lf)| {
            right.field(name).is_some_and(|rf| {
                lf.transient == rf.transient && self.values(&lf.value, &rf.value)
            })
        });
        equal
    }

    /// Multiset match; failed candidate matches roll back their assumptions
    fn bags(&mut self, xs: &[Value], ys: &[Value]) -> bool {
        if xs.len() != ys.len() {
            return false;
        }
        let mut used = vec![false; ys.len()];
        'outer: for x in xs {
            for (i, y) in ys.iter().enumerate() {
                if used[i] {
                    continue;
                }
                let saved = self.clone();
                if self.values(x, y) {
                    used[i] = true;
                    continue 'outer;
                }
                *self = saved;
            }
            return false;
        }
        true
    }
}

fn primitives(x: &Primitive, y: &Primitive) -> bool {
    match (x, y) {
        (Primitive::Float(a), Primitive::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
        _ => x == y,
    }
}
