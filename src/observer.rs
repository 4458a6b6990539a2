//! Diagnostic observers for registration and injection events.
//!
//! Observers are called synchronously while the container lock is held.
//! Keep implementations lightweight and never call back into the container.

use std::sync::Arc;
use std::time::Duration;

use crate::error::DiError;

/// Observer trait for injection events.
///
/// Every method has an empty default, so observers implement only what they
/// care about.
///
/// # Examples
///
/// ```
/// use ferrous_inject::{Container, InjectObserver};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// struct CountingObserver {
///     wired: AtomicUsize,
/// }
///
/// impl InjectObserver for CountingObserver {
///     fn field_injected(&self, _object: &str, _field: &str, _dependency: &str) {
///         self.wired.fetch_add(1, Ordering::SeqCst);
///     }
/// }
///
/// let observer = Arc::new(CountingObserver { wired: AtomicUsize::new(0) });
/// let container = Container::new();
/// container.add_observer(observer.clone());
/// container.inject().unwrap();
/// assert_eq!(observer.wired.load(Ordering::SeqCst), 0);
/// ```
pub trait InjectObserver: Send + Sync {
    /// An object was registered under `name` at position `order`.
    fn registered(&self, name: &str, order: usize, type_name: &str) {
        let _ = (name, order, type_name);
    }

    /// The engine starts wiring `object`.
    fn wiring(&self, object: &str) {
        let _ = object;
    }

    /// `field` of `object` now references `dependency`.
    fn field_injected(&self, object: &str, field: &str, dependency: &str) {
        let _ = (object, field, dependency);
    }

    /// Optional `field` of `object` matched nothing and stays empty.
    fn field_skipped(&self, object: &str, field: &str) {
        let _ = (object, field);
    }

    /// The injection pass aborted with `error`.
    fn injection_failed(&self, error: &DiError) {
        let _ = error;
    }

    /// The injection pass completed for `objects` objects.
    fn injected(&self, objects: usize, duration: Duration) {
        let _ = (objects, duration);
    }
}

/// Registered observers.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn InjectObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self { observers: Vec::new() }
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn InjectObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn registered(&self, name: &str, order: usize, type_name: &str) {
        for observer in &self.observers {
            observer.registered(name, order, type_name);
        }
    }

    #[inline]
    pub(crate) fn wiring(&self, object: &str) {
        for observer in &self.observers {
            observer.wiring(object);
        }
    }

    #[inline]
    pub(crate) fn field_injected(&self, object: &str, field: &str, dependency: &str) {
        for observer in &self.observers {
            observer.field_injected(object, field, dependency);
        }
    }

    #[inline]
    pub(crate) fn field_skipped(&self, object: &str, field: &str) {
        for observer in &self.observers {
            observer.field_skipped(object, field);
        }
    }

    #[inline]
    pub(crate) fn injection_failed(&self, error: &DiError) {
        for observer in &self.observers {
            observer.injection_failed(error);
        }
    }

    #[inline]
    pub(crate) fn injected(&self, objects: usize, duration: Duration) {
        for observer in &self.observers {
            observer.injected(objects, duration);
        }
    }
}

/// Built-in observer that forwards every event to `tracing`.
///
/// No subscriber is installed by this crate; events go wherever the
/// application's subscriber sends them.
///
/// # Examples
///
/// ```
/// use ferrous_inject::{Container, LoggingObserver};
/// use std::sync::Arc;
///
/// let container = Container::new();
/// container.add_observer(Arc::new(LoggingObserver::new()));
/// ```
#[derive(Debug, Clone)]
pub struct LoggingObserver {
    label: &'static str,
}

impl LoggingObserver {
    pub fn new() -> Self {
        Self { label: "ferrous_inject" }
    }

    /// Tags events with `label` in the `container` field.
    pub fn with_label(label: &'static str) -> Self {
        Self { label }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl InjectObserver for LoggingObserver {
    fn registered(&self, name: &str, order: usize, type_name: &str) {
        tracing::debug!(container = self.label, name, order, type_name, "object registered");
    }

    fn wiring(&self, object: &str) {
        tracing::debug!(container = self.label, object, "wiring object");
    }

    fn field_injected(&self, object: &str, field: &str, dependency: &str) {
        tracing::info!(container = self.label, object, field, dependency, "field injected");
    }

    fn field_skipped(&self, object: &str, field: &str) {
        tracing::warn!(container = self.label, object, field, "optional field not found, left empty");
    }

    fn injection_failed(&self, error: &DiError) {
        tracing::error!(container = self.label, %error, "injection failed");
    }

    fn injected(&self, objects: usize, duration: Duration) {
        tracing::info!(container = self.label, objects, ?duration, "injection complete");
    }
}
