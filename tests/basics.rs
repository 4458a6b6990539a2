use ferrous_inject::{Container, Declarations, DiError, Inject, Injectable, Phase};
use std::sync::Arc;

trait Greeter: Send + Sync {
    fn hello(&self) -> String;
}

struct A;

impl Greeter for A {
    fn hello(&self) -> String {
        "Hello I'm A".to_string()
    }
}

impl Injectable for A {
    fn declare(decl: &mut Declarations<Self>) {
        decl.provides::<dyn Greeter>(|this| this as Arc<dyn Greeter>);
    }
}

#[derive(Default)]
struct B {
    a: Inject<dyn Greeter>,
}

impl Injectable for B {
    fn declare(decl: &mut Declarations<Self>) {
        decl.tagged("a", |s| &s.a, r#"inject-name:"A""#);
    }
}

#[test]
fn test_greeter_wired_by_name() {
    let b = Arc::new(B::default());
    let container = Container::new();
    container.register("B", b.clone()).unwrap();
    container.register("A", Arc::new(A)).unwrap();

    container.inject().unwrap();

    assert_eq!(b.a.hello(), "Hello I'm A");
    assert_eq!(container.resolved("B", "a").as_deref(), Some("A"));
    assert!(container.is_complete("A"));
    assert!(container.is_complete("B"));
    assert_eq!(container.phase(), Phase::Injected);
}

#[test]
fn test_caller_and_container_share_the_instance() {
    let b = Arc::new(B::default());
    let container = Container::new();
    container.register("B", b.clone()).unwrap();
    container.register("A", Arc::new(A)).unwrap();
    container.inject().unwrap();

    let from_container = container.get::<B>("B").unwrap();
    assert!(Arc::ptr_eq(&b, &from_container));
    assert!(from_container.a.get().is_some());
}

#[test]
fn test_registration_order_and_lookup() {
    let container = Container::new();
    assert!(container.is_empty());

    container.register("second", Arc::new(A)).unwrap();
    container.register("first", Arc::new(B::default())).unwrap();

    assert_eq!(container.len(), 2);
    assert_eq!(container.names(), vec!["second".to_string(), "first".to_string()]);
    assert!(container.contains("first"));
    assert!(!container.contains("third"));
    container.with_registry(|registry| {
        assert_eq!(registry.get("second").unwrap().order(), 0);
        assert_eq!(registry.get("first").unwrap().order(), 1);
    });
}

#[test]
fn test_get_checks_the_concrete_type() {
    let container = Container::new();
    container.register("A", Arc::new(A)).unwrap();

    assert!(container.get::<A>("A").is_some());
    assert!(container.get::<B>("A").is_none());
    assert!(container.get::<A>("missing").is_none());
}

#[test]
fn test_get_as_capability() {
    let container = Container::new();
    container.register("A", Arc::new(A)).unwrap();
    container.register("B", Arc::new(B::default())).unwrap();

    let greeter = container.get_as::<dyn Greeter>("A").unwrap();
    assert_eq!(greeter.hello(), "Hello I'm A");
    assert!(container.get_as::<dyn Greeter>("B").is_none());
}

#[test]
fn test_duplicate_name_keeps_first_registration() {
    let container = Container::new();
    container.register("A", Arc::new(A)).unwrap();

    let err = container.register("A", Arc::new(B::default())).unwrap_err();
    assert!(matches!(err, DiError::DuplicateName(ref name) if name == "A"));
    assert_eq!(container.len(), 1);
    assert!(container.get::<A>("A").is_some());
}

#[test]
fn test_empty_name_is_rejected() {
    let container = Container::new();
    let err = container.register("", Arc::new(A)).unwrap_err();
    assert!(matches!(err, DiError::InvalidName));
    assert!(container.is_empty());
}

#[test]
fn test_empty_container_injects() {
    let container = Container::new();
    container.inject().unwrap();
    assert_eq!(container.phase(), Phase::Injected);
}

#[test]
fn test_container_is_sealed_after_inject() {
    let container = Container::new();
    container.register("A", Arc::new(A)).unwrap();
    container.inject().unwrap();

    assert!(matches!(container.inject(), Err(DiError::ContainerSealed)));
    assert!(matches!(
        container.register("B", Arc::new(B::default())),
        Err(DiError::ContainerSealed)
    ));
    assert_eq!(container.len(), 1);
}

#[test]
fn test_shared_dependency_injected_into_many() {
    #[derive(Default)]
    struct Consumer {
        greeter: Inject<dyn Greeter>,
    }
    impl Injectable for Consumer {
        fn declare(decl: &mut Declarations<Self>) {
            decl.field("greeter", |s| &s.greeter).named("A");
        }
    }

    let first = Arc::new(Consumer::default());
    let second = Arc::new(Consumer::default());
    let container = Container::new();
    container.register("A", Arc::new(A)).unwrap();
    container.register("c1", first.clone()).unwrap();
    container.register("c2", second.clone()).unwrap();
    container.inject().unwrap();

    assert!(Arc::ptr_eq(first.greeter.get().unwrap(), second.greeter.get().unwrap()));
}

#[test]
fn test_objects_without_fields_are_complete() {
    struct Leaf;
    impl Injectable for Leaf {}

    let container = Container::new();
    container.register("leaf", Arc::new(Leaf)).unwrap();
    container.inject().unwrap();

    assert!(container.is_complete("leaf"));
    assert!(container.resolved("leaf", "anything").is_none());
}

#[test]
fn test_report_lists_wiring() {
    let container = Container::new();
    container.register("B", Arc::new(B::default())).unwrap();
    container.register("A", Arc::new(A)).unwrap();
    container.inject().unwrap();

    let report = container.report();
    assert!(report.contains("2 object(s)"));
    assert!(report.contains("[0] B"));
    assert!(report.contains("[1] A"));
    assert!(report.contains("Greeter <- A"));
    assert!(report.contains("provides: dyn "));
}
