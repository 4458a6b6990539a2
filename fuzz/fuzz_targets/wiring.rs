#![no_main]

use ferrous_inject::{Container, Declarations, Inject, Injectable, NAME_ONLY, NAME_THEN_TYPE, TYPE_ONLY};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

const NAMES: [&str; 8] = ["n0", "n1", "n2", "n3", "n4", "n5", "n6", "n7"];
const STRATEGIES: [&str; 4] = [NAME_ONLY, TYPE_ONLY, NAME_THEN_TYPE, "Unknown"];

trait Vertex: Send + Sync {}

/// Vertex type `N` with two fields aimed at fixed names.
#[derive(Default)]
struct Node<const N: usize> {
    first: Inject<dyn Vertex>,
    second: Inject<dyn Vertex>,
}

impl<const N: usize> Vertex for Node<N> {}

impl<const N: usize> Injectable for Node<N> {
    fn declare(decl: &mut Declarations<Self>) {
        decl.provides::<dyn Vertex>(|this| this as Arc<dyn Vertex>);
        decl.field("first", |s| &s.first)
            .named(NAMES[(N * 3 + 1) % NAMES.len()])
            .strategy(STRATEGIES[N % STRATEGIES.len()])
            .required(N % 3 == 0);
        decl.field("second", |s| &s.second)
            .named(NAMES[(N * 5 + 2) % NAMES.len()])
            .strategy(STRATEGIES[(N + 1) % STRATEGIES.len()])
            .required(false);
    }
}

fn register(container: &Container, kind: u8, name: &str) {
    let _ = match kind % 4 {
        0 => container.register(name, Arc::new(Node::<0>::default())),
        1 => container.register(name, Arc::new(Node::<1>::default())),
        2 => container.register(name, Arc::new(Node::<2>::default())),
        _ => container.register(name, Arc::new(Node::<3>::default())),
    };
}

fuzz_target!(|data: &[u8]| {
    let container = Container::new();
    for pair in data.chunks_exact(2).take(32) {
        let name = NAMES[pair[0] as usize % NAMES.len()];
        register(&container, pair[1], name);
    }

    // Any outcome is fine; panics and inconsistent state are not.
    let result = container.inject();
    if result.is_ok() {
        for name in container.names() {
            assert!(container.is_complete(&name));
        }
    }
    let _ = container.report();
    assert!(container.inject().is_err());
});
