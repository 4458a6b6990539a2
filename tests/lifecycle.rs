use ferrous_inject::{
    AfterInject, BeforeInject, Container, Declarations, DiError, DynError, Inject, Injectable, Phase,
};
use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

type Events = Arc<Mutex<Vec<String>>>;

fn events() -> Events {
    Arc::new(Mutex::new(Vec::new()))
}

#[derive(Debug)]
struct NotReady(&'static str);

impl fmt::Display for NotReady {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not ready", self.0)
    }
}

impl Error for NotReady {}

struct Database {
    events: Events,
    fail: bool,
}

impl Injectable for Database {
    fn declare(decl: &mut Declarations<Self>) {
        decl.on_before_inject().on_after_inject();
    }
}

impl BeforeInject for Database {
    fn before_inject(&self) {
        self.events.lock().unwrap().push("db:before".to_string());
    }
}

impl AfterInject for Database {
    fn after_inject(&self) -> Result<(), DynError> {
        self.events.lock().unwrap().push("db:after".to_string());
        if self.fail {
            return Err(Box::new(NotReady("database")));
        }
        Ok(())
    }
}

struct Api {
    db: Inject<Database>,
    events: Events,
}

impl Injectable for Api {
    fn declare(decl: &mut Declarations<Self>) {
        decl.field("db", |s| &s.db).named("db");
        decl.on_before_inject().on_after_inject();
    }
}

impl BeforeInject for Api {
    fn before_inject(&self) {
        let state = if self.db.is_set() { "set" } else { "unset" };
        self.events.lock().unwrap().push(format!("api:before(db {state})"));
    }
}

impl AfterInject for Api {
    fn after_inject(&self) -> Result<(), DynError> {
        let state = if self.db.is_set() { "set" } else { "unset" };
        self.events.lock().unwrap().push(format!("api:after(db {state})"));
        Ok(())
    }
}

fn api(events: &Events) -> Arc<Api> {
    Arc::new(Api {
        db: Inject::new(),
        events: events.clone(),
    })
}

fn database(events: &Events, fail: bool) -> Arc<Database> {
    Arc::new(Database {
        events: events.clone(),
        fail,
    })
}

#[test]
fn test_hooks_run_in_dependency_order() {
    let events = events();
    let container = Container::new();
    container.register("api", api(&events)).unwrap();
    container.register("db", database(&events, false)).unwrap();

    container.inject().unwrap();

    assert_eq!(
        *events.lock().unwrap(),
        vec![
            "db:before".to_string(),
            "api:before(db unset)".to_string(),
            "db:after".to_string(),
            "api:after(db set)".to_string(),
        ]
    );
    assert!(container.is_complete("db"));
    assert!(container.is_complete("api"));
}

#[test]
fn test_after_hook_failure_aborts_without_rollback() {
    let events = events();
    let api = api(&events);
    let container = Container::new();
    container.register("api", api.clone()).unwrap();
    container.register("db", database(&events, true)).unwrap();

    let err = container.inject().unwrap_err();
    match &err {
        DiError::AfterInject { object, source } => {
            assert_eq!(object, "db");
            assert_eq!(source.to_string(), "database is not ready");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.source().is_some());
    assert_eq!(err.to_string(), "After-inject hook of 'db' failed: database is not ready");

    // Fields stay assigned; the dependent's after hook never ran.
    assert!(api.db.is_set());
    assert!(!events.lock().unwrap().iter().any(|e| e.starts_with("api:after")));
    assert!(!container.is_complete("db"));
    assert!(!container.is_complete("api"));
    assert_eq!(container.phase(), Phase::Failed);
}

#[test]
fn test_hooks_are_opt_in() {
    struct Quiet {
        touched: AtomicBool,
    }
    impl Injectable for Quiet {}
    impl AfterInject for Quiet {
        fn after_inject(&self) -> Result<(), DynError> {
            self.touched.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    let quiet = Arc::new(Quiet {
        touched: AtomicBool::new(false),
    });
    let container = Container::new();
    container.register("quiet", quiet.clone()).unwrap();
    container.inject().unwrap();

    // Implementing the trait without declaring it does nothing.
    assert!(!quiet.touched.load(Ordering::SeqCst));
    let descriptors = container.descriptors();
    assert!(!descriptors[0].1.has_after_hook());
}

#[test]
fn test_missing_dependency_stops_before_after_hooks() {
    let events = events();
    let container = Container::new();
    container.register("api", api(&events)).unwrap();

    match container.inject().unwrap_err() {
        DiError::MissingRequiredDependency { object, field, requested } => {
            assert_eq!((object.as_str(), field.as_str(), requested.as_str()), ("api", "db", "db"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(*events.lock().unwrap(), vec!["api:before(db unset)".to_string()]);
}

#[test]
fn test_prefilled_field_with_same_instance_is_unchanged() {
    let events = events();
    let db = database(&events, false);
    let api = Arc::new(Api {
        db: Inject::from(db.clone()),
        events: events.clone(),
    });

    let container = Container::new();
    container.register("db", db.clone()).unwrap();
    container.register("api", api.clone()).unwrap();
    container.inject().unwrap();

    assert!(Arc::ptr_eq(api.db.get().unwrap(), &db));
    assert_eq!(container.resolved("api", "db").as_deref(), Some("db"));
}

#[test]
fn test_prefilled_field_with_other_instance_conflicts() {
    let events = events();
    let api = Arc::new(Api {
        db: Inject::from(database(&events, false)),
        events: events.clone(),
    });

    let container = Container::new();
    container.register("db", database(&events, false)).unwrap();
    container.register("api", api).unwrap();

    assert!(matches!(
        container.inject(),
        Err(DiError::FieldAlreadyAssigned { ref object, ref field }) if object == "api" && field == "db"
    ));
}

struct Exploding;

impl Injectable for Exploding {
    fn declare(decl: &mut Declarations<Self>) {
        decl.on_before_inject();
    }
}

impl BeforeInject for Exploding {
    fn before_inject(&self) {
        panic!("exploding hook");
    }
}

#[test]
fn test_panicking_hook_still_seals_container() {
    let container = Container::new();
    container.register("exploding", Arc::new(Exploding)).unwrap();

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| container.inject()));
    assert!(outcome.is_err());

    assert_eq!(container.phase(), Phase::Failed);
    assert!(matches!(
        container.register("late", Arc::new(Exploding)),
        Err(DiError::ContainerSealed)
    ));
    assert!(matches!(container.inject(), Err(DiError::ContainerSealed)));
    assert!(!container.contains("late"));
}
