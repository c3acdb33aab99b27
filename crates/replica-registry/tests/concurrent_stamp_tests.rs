//! Concurrent stamping against re-registration.
//!
//! Readers must always observe one whole template: never a mix of the old
//! and the new one, never a missing entry while a name is being replaced.

use replica_registry::PrototypeRegistry;
use replica_value::{Composite, FieldPath, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

fn versioned(version: i64) -> Value {
    let inner = Composite::new("inner").with("version", version);
    Composite::new("outer")
        .with("version", version)
        .with("inner", inner)
        .with("history", Value::list((0..16).map(|_| version)))
        .into()
}

fn versions(v: &Value) -> Vec<i64> {
    let mut out = vec![
        v.lookup(&"version".parse::<FieldPath>().unwrap())
            .and_then(|x| x.as_int())
            .unwrap(),
        v.lookup(&"inner.version".parse::<FieldPath>().unwrap())
            .and_then(|x| x.as_int())
            .unwrap(),
    ];
    let history = v.lookup(&"history".parse::<FieldPath>().unwrap()).unwrap();
    out.extend(history.as_items().unwrap().iter().filter_map(Value::as_int));
    out
}

#[test]
fn stamps_never_observe_torn_templates() {
    let registry = Arc::new(PrototypeRegistry::new());
    registry.register("doc", versioned(0));
    let done = Arc::new(AtomicBool::new(false));

    thread::scope(|scope| {
        for _ in 0..4 {
            let registry = Arc::clone(&registry);
            let done = Arc::clone(&done);
            scope.spawn(move || {
                let mut stamps = 0;
                while !done.load(Ordering::Acquire) || stamps == 0 {
                    let stamped = registry.stamp("doc").unwrap();
                    let seen = versions(&stamped);
                    assert!(seen.iter().all(|v| *v == seen[0]), "torn stamp: {seen:?}");
                    stamps += 1;
                }
            });
        }

        let writer = Arc::clone(&registry);
        scope.spawn(move || {
            for version in 1..=200 {
                writer.register("doc", versioned(version));
            }
            done.store(true, Ordering::Release);
        });
    });

    let last = registry.stamp("doc").unwrap();
    assert_eq!(versions(&last)[0], 200);
}

#[test]
fn clones_are_exclusively_owned_across_threads() {
    let registry = Arc::new(PrototypeRegistry::new());
    registry.register("doc", versioned(1));

    let results: Vec<Value> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8_i64)
            .map(|i| {
                let registry = Arc::clone(&registry);
                scope.spawn(move || {
                    let mut stamped = registry.stamp("doc").unwrap();
                    stamped
                        .assign(&"inner.version".parse().unwrap(), Value::from(100 + i))
                        .unwrap();
                    stamped
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (i, stamped) in (0_i64..).zip(&results) {
        assert_eq!(versions(stamped)[1], 100 + i);
    }
    assert_eq!(versions(&registry.stamp("doc").unwrap())[1], 1);
}
