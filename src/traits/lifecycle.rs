//! Lifecycle hook traits for injected objects.

use crate::error::DynError;

/// Hook invoked right before the container assigns an object's fields.
///
/// Opt in from [`Injectable::declare`](crate::Injectable::declare) with
/// [`Declarations::on_before_inject`](crate::Declarations::on_before_inject).
///
/// # Examples
///
/// ```
/// use ferrous_inject::{BeforeInject, Container, Declarations, Injectable};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// #[derive(Default)]
/// struct Cache {
///     primed: AtomicBool,
/// }
///
/// impl BeforeInject for Cache {
///     fn before_inject(&self) {
///         self.primed.store(true, Ordering::SeqCst);
///     }
/// }
///
/// impl Injectable for Cache {
///     fn declare(decl: &mut Declarations<Self>) {
///         decl.on_before_inject();
///     }
/// }
///
/// let cache = Arc::new(Cache::default());
/// let container = Container::new();
/// container.register("cache", cache.clone()).unwrap();
/// container.inject().unwrap();
/// assert!(cache.primed.load(Ordering::SeqCst));
/// ```
pub trait BeforeInject: Send + Sync + 'static {
    /// Runs before any of this object's dependencies land.
    fn before_inject(&self);
}

/// Hook invoked once every registered object has been wired.
///
/// A returned error aborts the injection pass and is surfaced from
/// [`Container::inject`](crate::Container::inject). Fields stay assigned.
///
/// # Examples
///
/// ```
/// use ferrous_inject::{AfterInject, Container, Declarations, DiError, DynError, Injectable};
/// use std::sync::Arc;
///
/// struct Validator;
///
/// impl AfterInject for Validator {
///     fn after_inject(&self) -> Result<(), DynError> {
///         Err("configuration incomplete".into())
///     }
/// }
///
/// impl Injectable for Validator {
///     fn declare(decl: &mut Declarations<Self>) {
///         decl.on_after_inject();
///     }
/// }
///
/// let container = Container::new();
/// container.register("validator", Arc::new(Validator)).unwrap();
/// match container.inject() {
///     Err(DiError::AfterInject { object, .. }) => assert_eq!(object, "validator"),
///     other => panic!("unexpected: {:?}", other),
/// }
/// ```
pub trait AfterInject: Send + Sync + 'static {
    /// Runs after the whole graph is wired, in dependency order.
    fn after_inject(&self) -> Result<(), DynError>;
}
