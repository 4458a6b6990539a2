use ferrous_inject::{
    Container, ContainerConfig, Declarations, DiError, Inject, InjectObserver, Injectable, LoggingObserver,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl InjectObserver for Recorder {
    fn registered(&self, name: &str, order: usize, _type_name: &str) {
        self.push(format!("registered {name} #{order}"));
    }

    fn wiring(&self, object: &str) {
        self.push(format!("wiring {object}"));
    }

    fn field_injected(&self, object: &str, field: &str, dependency: &str) {
        self.push(format!("injected {object}.{field} <- {dependency}"));
    }

    fn field_skipped(&self, object: &str, field: &str) {
        self.push(format!("skipped {object}.{field}"));
    }

    fn injection_failed(&self, error: &DiError) {
        self.push(format!("failed {error}"));
    }

    fn injected(&self, objects: usize, _duration: Duration) {
        self.push(format!("done {objects}"));
    }
}

struct Clock;
impl Injectable for Clock {}

#[derive(Default)]
struct Scheduler {
    clock: Inject<Clock>,
    metrics: Inject<Clock>,
}

impl Injectable for Scheduler {
    fn declare(decl: &mut Declarations<Self>) {
        decl.field("clock", |s| &s.clock).named("clock").strategy("NameOnly");
        decl.field("metrics", |s| &s.metrics)
            .named("metrics")
            .strategy("NameOnly")
            .optional();
    }
}

#[test]
fn test_observer_sees_every_event() {
    let recorder = Arc::new(Recorder::default());
    let container = Container::new();
    container.add_observer(recorder.clone());

    container.register("scheduler", Arc::new(Scheduler::default())).unwrap();
    container.register("clock", Arc::new(Clock)).unwrap();
    container.inject().unwrap();

    assert_eq!(
        recorder.events(),
        vec![
            "registered scheduler #0",
            "registered clock #1",
            "wiring clock",
            "wiring scheduler",
            "injected scheduler.clock <- clock",
            "skipped scheduler.metrics",
            "done 2",
        ]
    );
}

#[test]
fn test_observer_sees_failures() {
    let recorder = Arc::new(Recorder::default());
    let container = Container::new();
    container.add_observer(recorder.clone());

    container.register("scheduler", Arc::new(Scheduler::default())).unwrap();
    assert!(container.inject().is_err());

    let events = recorder.events();
    assert_eq!(events.last().map(String::as_str), Some(
        "failed Field 'clock' of 'scheduler' requires 'clock' but nothing matched"
    ));
    assert!(!events.iter().any(|e| e.starts_with("done")));
}

#[test]
fn test_failed_registration_is_not_observed() {
    let recorder = Arc::new(Recorder::default());
    let container = Container::new();
    container.add_observer(recorder.clone());

    container.register("clock", Arc::new(Clock)).unwrap();
    assert!(container.register("clock", Arc::new(Clock)).is_err());

    assert_eq!(recorder.events(), vec!["registered clock #0"]);
}

#[test]
fn test_logging_observer_under_a_subscriber() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let container = Container::with_config(ContainerConfig {
            log_wiring: true,
            ..ContainerConfig::default()
        });
        container.add_observer(Arc::new(LoggingObserver::with_label("scheduler-test")));
        container.register("scheduler", Arc::new(Scheduler::default())).unwrap();
        container.register("clock", Arc::new(Clock)).unwrap();
        container.inject().unwrap();
        assert!(container.is_complete("scheduler"));
    });
}

#[test]
fn test_logging_observer_carries_its_label() {
    assert!(format!("{:?}", LoggingObserver::with_label("billing")).contains(r#"label: "billing""#));
    assert!(format!("{:?}", LoggingObserver::new()).contains(r#"label: "ferrous_inject""#));
}
