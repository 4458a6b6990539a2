//! # ferrous-inject
//!
//! Startup-time dependency injection for Rust: register named, already
//! constructed objects, then wire their declared fields in a single pass.
//!
//! ## Features
//!
//! - **Named registry**: names are unique, registration order is recorded
//! - **Field matching**: by name, by type, or name first with a type fallback
//! - **Dependency ordering**: objects are wired after the objects they name,
//!   and cycles are reported with their full path
//! - **Lifecycle hooks**: an infallible before-inject hook and a fallible
//!   after-inject hook, both opt-in and checked at compile time
//! - **Diagnostics**: wiring reports, graph export and `tracing` observers
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_inject::{Container, Declarations, Inject, Injectable};
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//!     fn hello(&self) -> String;
//! }
//!
//! struct English;
//! impl Greeter for English {
//!     fn hello(&self) -> String {
//!         "Hello".to_string()
//!     }
//! }
//! impl Injectable for English {
//!     fn declare(decl: &mut Declarations<Self>) {
//!         decl.provides::<dyn Greeter>(|this| this as Arc<dyn Greeter>);
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Frontdesk {
//!     greeter: Inject<dyn Greeter>,
//! }
//! impl Injectable for Frontdesk {
//!     fn declare(decl: &mut Declarations<Self>) {
//!         // No object is named "greeter", so the type fallback finds English.
//!         decl.field("greeter", |s| &s.greeter).named("greeter");
//!     }
//! }
//!
//! let desk = Arc::new(Frontdesk::default());
//! let container = Container::new();
//! container.register("desk", desk.clone()).unwrap();
//! container.register("english", Arc::new(English)).unwrap();
//! container.inject().unwrap();
//!
//! assert_eq!(desk.greeter.hello(), "Hello");
//! ```
//!
//! ## Field tags
//!
//! Fields can also be declared from a struct-tag style annotation:
//!
//! ```rust
//! use ferrous_inject::{Container, Declarations, Inject, Injectable};
//! use std::sync::Arc;
//!
//! struct Cache;
//! impl Injectable for Cache {}
//!
//! #[derive(Default)]
//! struct Service {
//!     cache: Inject<Cache>,
//! }
//! impl Injectable for Service {
//!     fn declare(decl: &mut Declarations<Self>) {
//!         decl.tagged(
//!             "cache",
//!             |s| &s.cache,
//!             r#"inject-name:"cache" inject-required:"false" inject-strategy:"NameOnly""#,
//!         );
//!     }
//! }
//!
//! let service = Arc::new(Service::default());
//! let container = Container::new();
//! container.register("service", service.clone()).unwrap();
//! container.inject().unwrap();
//!
//! // Optional and unmatched: left empty.
//! assert!(service.cache.get().is_none());
//! ```
//!
//! ## Lifecycle
//!
//! 1. `before_inject` runs on each object just before its fields are set.
//! 2. Fields are assigned, dependencies before dependents.
//! 3. After every object is wired, `after_inject` runs in the same order; the
//!    first failure aborts the pass.
//!
//! Nothing is rolled back on failure.

pub mod config;
pub mod descriptors;
pub mod error;
pub mod graph;
pub mod graph_export;
pub mod key;
pub mod observer;
pub mod registration;
pub mod slot;
pub mod strategy;
pub mod tag;
pub mod traits;

mod container;
mod internal;

pub use config::ContainerConfig;
pub use container::{Container, Phase};
pub use descriptors::{AnyArc, Declarations, Describer, FieldBuilder, FieldDependency, ObjectDescriptor};
pub use error::{DiError, DiResult, DynError};
pub use graph::{Cycle, DependencyGraph};
pub use graph_export::{ExportFormat, GraphSnapshot};
pub use key::{key_of_type, TypeKey};
pub use observer::{InjectObserver, LoggingObserver};
pub use registration::{ObjectRecord, Registry};
pub use slot::Inject;
pub use strategy::{
    FieldMatchStrategy, NameOnly, NameThenType, StrategyRegistry, StrategyRegistryBuilder, TypeOnly,
    DEFAULT_STRATEGY, NAME_ONLY, NAME_THEN_TYPE, TYPE_ONLY,
};
pub use tag::FieldTag;
pub use traits::{AfterInject, BeforeInject, Injectable};
