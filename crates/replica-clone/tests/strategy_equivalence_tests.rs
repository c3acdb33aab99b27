//! Structural vs serialization strategies.
//!
//! On acyclic graphs without transient fields both strategies must agree
//! field for field. They are allowed to differ, predictably, on sharing and
//! on cycles.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use replica_clone::{
    CloneConfig, CloneError, CloneStrategy, DroppedFieldPolicy, Fidelity, JsonCodec, Resource,
    SerializationCloner, StructuralCloner,
};
use replica_test_utils::{arb_acyclic_value, chain, diamond, employee_template, init_tracing, ring};
use replica_value::{deep_equal, same_topology, shares_nodes, Composite, NodeRef, Value};

fn structural() -> StructuralCloner {
    StructuralCloner::new()
}

fn serialization() -> SerializationCloner<JsonCodec> {
    SerializationCloner::new(JsonCodec::new())
}

proptest! {
    #[test]
    fn prop_structural_clone_is_deep_equal_and_detached(v in arb_acyclic_value()) {
        let copy = structural().clone_value(&v).unwrap();
        prop_assert!(deep_equal(&v, &copy));
        prop_assert!(same_topology(&v, &copy));
        prop_assert!(!shares_nodes(&v, &copy));
    }

    #[test]
    fn prop_strategies_agree_on_acyclic_graphs(v in arb_acyclic_value()) {
        let a = structural().clone_value(&v).unwrap();
        let b = serialization().clone_value(&v).unwrap();
        prop_assert!(deep_equal(&a, &b));
        prop_assert!(!shares_nodes(&a, &b));
    }

    #[test]
    fn prop_clones_are_deterministic(v in arb_acyclic_value()) {
        let first = structural().clone_value(&v).unwrap();
        let second = structural().clone_value(&v).unwrap();
        prop_assert!(deep_equal(&first, &second));
        prop_assert!(!shares_nodes(&first, &second));
    }
}

/// Tenet: mutating anything reachable from the clone never shows in the
/// source, and vice versa.
#[test]
fn mutation_does_not_cross_between_source_and_clone() {
    init_tracing();
    let source = employee_template();
    for strategy in [&structural() as &dyn CloneStrategy, &serialization()] {
        let copy = strategy.clone_value(&source).unwrap();

        let copy_office = copy.as_node().unwrap().get("office").unwrap();
        copy_office.as_node().unwrap().set("suite", 42);
        let source_office = source.as_node().unwrap().get("office").unwrap();
        assert_eq!(source_office.as_node().unwrap().get("suite").unwrap().as_int(), Some(0));

        source_office.as_node().unwrap().set("city", "Leeds");
        assert_eq!(
            copy_office.as_node().unwrap().get("city").unwrap().as_text(),
            Some("London")
        );
        source_office.as_node().unwrap().set("city", "London");
    }
}

/// Tenet: shared-reference fidelity is what separates the strategies on
/// acyclic graphs.
#[test]
fn sharing_kept_by_structural_duplicated_by_serialization() {
    let source = diamond();

    let graph = structural().clone_value(&source).unwrap();
    let g = graph.as_node().unwrap();
    let (left, right) = (g.get("left").unwrap(), g.get("right").unwrap());
    assert!(left.as_node().unwrap().ptr_eq(right.as_node().unwrap()));
    assert!(same_topology(&source, &graph));

    let tree = serialization().clone_value(&source).unwrap();
    let t = tree.as_node().unwrap();
    let (left, right) = (t.get("left").unwrap(), t.get("right").unwrap());
    assert!(!left.as_node().unwrap().ptr_eq(right.as_node().unwrap()));
    assert!(deep_equal(&source, &tree));
    assert!(!same_topology(&source, &tree));

    assert_eq!(structural().fidelity(), Fidelity::Graph);
    assert_eq!(serialization().fidelity(), Fidelity::Tree);
}

/// Tenet: on a cycle, serialization fails loudly while structural succeeds
/// and preserves the cycle.
#[test]
fn cycle_diverges_predictably() {
    let head = ring(3);
    let source = Value::Node(head.clone());

    let err = serialization().clone_value(&source).unwrap_err();
    assert!(matches!(err, CloneError::CyclicStructureUnsupported { codec: "json", .. }));

    let copy = structural().clone_value(&source).unwrap();
    assert!(same_topology(&source, &copy));

    head.detach();
    copy.as_node().unwrap().detach();
}

/// Tenet: transient fields are the documented loss of the serialization
/// strategy; the strict policy turns that loss into an error.
#[test]
fn transient_fields_dropped_or_rejected() {
    let source: Value = Composite::new("session")
        .with("user", "jane")
        .with_transient("socket", Value::foreign(String::from("fd:7")))
        .into();

    let lenient = serialization().clone_value(&source).unwrap();
    assert!(lenient.as_node().unwrap().get("socket").is_none());
    assert_eq!(lenient.as_node().unwrap().get("user").unwrap().as_text(), Some("jane"));

    let strict = SerializationCloner::new(JsonCodec::with_config(
        CloneConfig::default().with_dropped_fields(DroppedFieldPolicy::Fail),
    ));
    assert!(matches!(strict.clone_value(&source), Err(CloneError::EncodeError { .. })));

    // Structural sees every field and has no rule for the handle.
    assert!(matches!(
        structural().clone_value(&source),
        Err(CloneError::UnsupportedFieldType { ref path, .. }) if path == "socket"
    ));
}

/// Shared node, a two-node cycle, a host handle and nested lists.
fn fragile_graph(handle: &Value) -> Value {
    let shared = NodeRef::new(Composite::new("shared").with("n", 1));
    let a = NodeRef::new(Composite::new("ring").with("v", 0));
    let b = NodeRef::new(Composite::new("ring").with("v", 1).with("next", &a));
    a.set("next", &b);
    Composite::new("root")
        .with("left", &shared)
        .with("right", &shared)
        .with("ring", &a)
        .with("deep", Value::list([Value::list([Value::list([1])])]))
        .with("handle", handle.clone())
        .into()
}

fn release(graph: &Value) {
    let ring = graph.as_node().unwrap().get("ring").unwrap();
    ring.as_node().unwrap().detach();
}

/// Tenet: a failed clone leaves the source exactly as it was, values and
/// topology alike.
#[test]
fn failed_clones_leave_source_untouched() {
    let handle = Value::foreign(String::from("fd:3"));
    let source = fragile_graph(&handle);
    let reference = fragile_graph(&handle);

    let fail = |strategy: &dyn CloneStrategy| {
        let err = strategy.clone_value(&source).unwrap_err();
        assert!(deep_equal(&source, &reference), "{} altered the source", strategy.name());
        assert!(same_topology(&source, &reference));
        err
    };

    assert!(matches!(
        fail(&structural()),
        CloneError::UnsupportedFieldType { ref path, .. } if path == "handle"
    ));
    assert!(matches!(
        fail(&StructuralCloner::with_config(CloneConfig::default().with_max_depth(2))),
        CloneError::ResourceExhausted { resource: Resource::Depth, .. }
    ));
    assert!(matches!(
        fail(&StructuralCloner::with_config(CloneConfig::default().with_max_nodes(2))),
        CloneError::ResourceExhausted { resource: Resource::Nodes, .. }
    ));
    assert!(matches!(
        fail(&serialization()),
        CloneError::CyclicStructureUnsupported { .. }
    ));

    release(&source);
    release(&reference);
}

/// Tenet: a non-transient host handle is an encode error, not a silent drop.
#[test]
fn foreign_handle_is_encode_error() {
    let source: Value = Composite::new("h").with("file", Value::foreign(1_u32)).into();
    let err = serialization().clone_value(&source).unwrap_err();
    assert!(matches!(err, CloneError::EncodeError { ref message, .. } if message.contains("file")));
}

/// Tenet: both strategies honour the same ceilings.
#[test]
fn ceilings_apply_to_both_strategies() {
    let config = CloneConfig::default().with_max_depth(8);
    let long = chain(20);

    let s = StructuralCloner::with_config(config.clone());
    let j = SerializationCloner::new(JsonCodec::with_config(config));
    for strategy in [&s as &dyn CloneStrategy, &j] {
        assert_eq!(
            strategy.clone_value(&long).unwrap_err(),
            CloneError::ResourceExhausted {
                resource: Resource::Depth,
                limit: 8
            }
        );
    }

    let short = chain(3);
    assert!(deep_equal(&s.clone_value(&short).unwrap(), &j.clone_value(&short).unwrap()));
}

/// Tenet: the serialization node ceiling counts duplicated shared nodes, so
/// exponential fan-out through sharing is caught.
#[test]
fn shared_fan_out_hits_node_ceiling_in_serialization_only() {
    let mut level = NodeRef::new(Composite::new("leaf"));
    for _ in 0..12 {
        level = NodeRef::new(Composite::new("fan").with("a", &level).with("b", &level));
    }
    let source = Value::Node(level);
    let config = CloneConfig::default().with_max_nodes(1_000);

    let copy = StructuralCloner::with_config(config.clone())
        .clone_value(&source)
        .unwrap();
    assert!(same_topology(&source, &copy));

    let err = SerializationCloner::new(JsonCodec::with_config(config))
        .clone_value(&source)
        .unwrap_err();
    assert!(matches!(
        err,
        CloneError::ResourceExhausted {
            resource: Resource::Nodes,
            limit: 1_000
        }
    ));
}

/// Tenet: deep but legitimate graphs round-trip through the codec.
#[test]
fn deep_chain_round_trips() {
    let long = chain(300);
    let a = structural().clone_value(&long).unwrap();
    let b = serialization().clone_value(&long).unwrap();
    assert!(deep_equal(&a, &b));
}
