//! Testing utilities for the Replica workspace
//!
//! Shared fixtures, graph builders and proptest strategies.

#![allow(missing_docs)]

use proptest::prelude::*;
use replica_value::{Composite, NodeRef, Value};

/// `{name: "", office: {street: "123 East Dr", city: "London", suite: 0}}`
pub fn employee_template() -> Value {
    let office = Composite::new("address")
        .with("street", "123 East Dr")
        .with("city", "London")
        .with("suite", 0);
    Composite::new("employee")
        .with("name", "")
        .with("office", office)
        .into()
}

/// Two fields of the root referencing the same `shared` node
pub fn diamond() -> Value {
    let shared = NodeRef::new(Composite::new("shared").with("count", 1));
    Composite::new("root")
        .with("left", &shared)
        .with("right", &shared)
        .with("label", "diamond")
        .into()
}

/// Ring of `len` nodes, each `{v: i, next: <following node>}`
///
/// The caller owns the cycle; call `detach` on the returned head when done.
pub fn ring(len: usize) -> NodeRef {
    assert!(len > 0, "ring needs at least one node");
    let nodes: Vec<NodeRef> = (0_i64..)
        .take(len)
        .map(|i| NodeRef::new(Composite::new("ring").with("v", i)))
        .collect();
    for (i, node) in nodes.iter().enumerate() {
        node.set("next", &nodes[(i + 1) % len]);
    }
    nodes[0].clone()
}

/// Linked chain `{v: 0, next: {v: 1, next: ... null}}` of `len` nodes
pub fn chain(len: usize) -> Value {
    let mut tail = Value::null();
    for i in (0..i64::try_from(len).unwrap_or(i64::MAX)).rev() {
        tail = Composite::new("link")
            .with("v", i)
            .with("next", tail)
            .into();
    }
    tail
}

/// Follow `next` from `start` `hops` times
pub fn follow_next(start: &NodeRef, hops: usize) -> Option<NodeRef> {
    let mut current = start.clone();
    for _ in 0..hops {
        let next = current.get("next")?;
        current = next.as_node()?.clone();
    }
    Some(current)
}

/// Install a test-writer tracing subscriber (idempotent)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::new("replica_clone=debug,replica_registry=debug"))
        .try_init();
}

/// Primitives that every codec can represent faithfully
pub fn arb_primitive() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::null()),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        (-1.0e12..1.0e12f64).prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,12}".prop_map(Value::from),
        proptest::collection::vec(any::<u8>(), 0..8).prop_map(Value::from),
    ]
}

/// Random acyclic, tree-shaped graphs without transient fields
pub fn arb_acyclic_value() -> impl Strategy<Value = Value> {
    arb_primitive().prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..6).prop_map(Value::List),
            proptest::collection::vec(inner.clone(), 0..6).prop_map(Value::Bag),
            (
                "[a-z]{1,6}",
                proptest::collection::vec(("[a-z]{1,4}", inner), 0..5)
            )
                .prop_map(|(type_name, fields)| {
                    let mut body = Composite::new(type_name);
                    for (name, value) in fields {
                        body.set(name, value);
                    }
                    Value::from(body)
                }),
        ]
    })
}
