//! The container: registration, the injection pass and introspection.

use std::fmt::{self, Write as _};
use std::sync::Arc;
use std::time::Instant;

use crate::config::ContainerConfig;
use crate::descriptors::{AnyArc, Describer, ObjectDescriptor};
use crate::error::{DiError, DiResult};
use crate::graph::DependencyGraph;
use crate::internal::{StateGuard, StateLock};
use crate::key::TypeKey;
use crate::observer::{InjectObserver, LoggingObserver, Observers};
use crate::registration::Registry;
use crate::strategy::StrategyRegistry;
use crate::traits::Injectable;

mod engine;

pub(crate) use engine::build_graph;
use engine::InjectionEngine;

/// Where a container is in its single-pass lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Accepting registrations
    Open,
    /// Injection pass succeeded
    Injected,
    /// Injection pass failed; objects may be partially wired
    Failed,
}

struct ContainerState {
    registry: Registry,
    observers: Observers,
    phase: Phase,
}

/// Startup-time injection container.
///
/// Register named instances, then call [`inject`](Container::inject) once.
/// Registration and injection each hold one container-wide lock for their
/// whole duration. Lifecycle hooks and observers run under that lock and
/// must not call back into the container.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{Container, Declarations, Inject, Injectable};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn hello(&self) -> String;
/// }
///
/// struct A;
/// impl Greeter for A {
///     fn hello(&self) -> String { "Hello I'm A".into() }
/// }
/// impl Injectable for A {
///     fn declare(decl: &mut Declarations<Self>) {
///         decl.provides::<dyn Greeter>(|this| this as Arc<dyn Greeter>);
///     }
/// }
///
/// #[derive(Default)]
/// struct B {
///     a: Inject<dyn Greeter>,
/// }
/// impl Injectable for B {
///     fn declare(decl: &mut Declarations<Self>) {
///         decl.tagged("a", |s| &s.a, r#"inject-name:"A""#);
///     }
/// }
///
/// let b = Arc::new(B::default());
/// let container = Container::new();
/// container.register("B", b.clone()).unwrap();
/// container.register("A", Arc::new(A)).unwrap();
/// container.inject().unwrap();
///
/// assert_eq!(b.a.hello(), "Hello I'm A");
/// assert_eq!(container.resolved("B", "a").as_deref(), Some("A"));
/// ```
pub struct Container {
    state: StateLock<ContainerState>,
    strategies: StrategyRegistry,
    config: ContainerConfig,
}

impl Container {
    /// Creates an empty container with default configuration and the
    /// built-in strategies.
    pub fn new() -> Self {
        Self::configured(ContainerConfig::default(), StrategyRegistry::builtin())
    }

    pub fn with_config(config: ContainerConfig) -> Self {
        Self::configured(config, StrategyRegistry::builtin())
    }

    pub fn with_strategies(strategies: StrategyRegistry) -> Self {
        Self::configured(ContainerConfig::default(), strategies)
    }

    pub fn configured(config: ContainerConfig, strategies: StrategyRegistry) -> Self {
        let mut observers = Observers::new();
        if config.log_wiring {
            observers.add(Arc::new(LoggingObserver::new()));
        }
        Self {
            state: StateLock::new(ContainerState {
                registry: Registry::with_capacity(config.capacity),
                observers,
                phase: Phase::Open,
            }),
            strategies,
            config,
        }
    }

    fn state(&self) -> StateGuard<'_, ContainerState> {
        self.state.lock()
    }

    /// Adds a diagnostic observer for registration and injection events.
    pub fn add_observer(&self, observer: Arc<dyn InjectObserver>) -> &Self {
        self.state().observers.add(observer);
        self
    }

    // ----- Registration -----

    /// Registers `instance` under `name`.
    ///
    /// The container keeps a clone of the `Arc`; the caller keeps ownership of
    /// theirs and sees the injected fields through it.
    ///
    /// # Errors
    ///
    /// `InvalidName` for an empty name, `DuplicateName` when the name is
    /// taken, `UnknownStrategy` in strict mode, `ContainerSealed` once
    /// [`inject`](Container::inject) has run. A failed registration leaves
    /// the container unchanged.
    pub fn register<T: Injectable>(&self, name: impl Into<String>, instance: Arc<T>) -> DiResult<()> {
        self.register_with(name, instance, Describer::of::<T>())
    }

    /// Registers a type-erased instance described by `describer`.
    ///
    /// Fails with `InvalidInstanceKind` when the instance is not of the type
    /// the describer was made for.
    pub fn register_with(
        &self,
        name: impl Into<String>,
        instance: AnyArc,
        describer: Describer,
    ) -> DiResult<()> {
        let name = name.into();
        let mut state = self.state();
        if state.phase != Phase::Open {
            return Err(DiError::ContainerSealed);
        }
        if name.is_empty() {
            return Err(DiError::InvalidName);
        }

        let descriptor = describer.describe(&name, &instance)?;
        if self.config.strict_strategies {
            self.check_strategies(&name, &descriptor)?;
        }

        let type_name = descriptor.type_key().display_name();
        let order = state.registry.insert(name.clone(), instance, descriptor)?;
        state.observers.registered(&name, order, type_name);
        Ok(())
    }

    fn check_strategies(&self, name: &str, descriptor: &ObjectDescriptor) -> DiResult<()> {
        match descriptor
            .fields()
            .iter()
            .find(|field| !self.strategies.contains(field.strategy()))
        {
            Some(field) => Err(DiError::UnknownStrategy {
                object: name.to_string(),
                field: field.field_name().to_string(),
                strategy: field.strategy().to_string(),
            }),
            None => Ok(()),
        }
    }

    // ----- Injection -----

    /// Wires every registered object, dependencies before dependents.
    ///
    /// Runs once per container; any later call fails with `ContainerSealed`.
    /// The first error aborts the pass. Fields assigned before the error stay
    /// assigned, so after an error the affected objects must not be used.
    pub fn inject(&self) -> DiResult<()> {
        let mut state = self.state();
        if state.phase != Phase::Open {
            return Err(DiError::ContainerSealed);
        }

        let started = Instant::now();
        let ContainerState { registry, observers, phase } = &mut *state;
        // Sealed up front so a panicking hook cannot leave the container open.
        *phase = Phase::Failed;
        let result = InjectionEngine::new(&self.strategies, observers).run(registry);

        match result {
            Ok(count) => {
                *phase = Phase::Injected;
                if observers.has_observers() {
                    observers.injected(count, started.elapsed());
                }
                Ok(())
            }
            Err(error) => {
                observers.injection_failed(&error);
                Err(error)
            }
        }
    }

    // ----- Introspection -----

    pub fn phase(&self) -> Phase {
        self.state().phase
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    pub fn strategies(&self) -> &StrategyRegistry {
        &self.strategies
    }

    pub fn len(&self) -> usize {
        self.state().registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().registry.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.state().registry.contains(name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.state().registry.iter().map(|r| r.name().to_string()).collect()
    }

    /// The instance registered as `name`, if it is a `T`.
    pub fn get<T: Send + Sync + 'static>(&self, name: &str) -> Option<Arc<T>> {
        let state = self.state();
        let record = state.registry.get(name)?;
        record.instance().clone().downcast::<T>().ok()
    }

    /// The instance registered as `name`, viewed as capability `C`.
    pub fn get_as<C: ?Sized + Send + Sync + 'static>(&self, name: &str) -> Option<Arc<C>> {
        let state = self.state();
        let record = state.registry.get(name)?;
        let provided = record
            .descriptor()
            .provide(record.instance(), &TypeKey::of::<C>())?;
        provided.downcast::<Arc<C>>().ok().map(|boxed| *boxed)
    }

    /// Whether `name` was fully wired and its after-inject hook succeeded.
    pub fn is_complete(&self, name: &str) -> bool {
        self.state().registry.get(name).is_some_and(|r| r.is_complete())
    }

    /// Name of the object injected into `field` of `name`.
    pub fn resolved(&self, name: &str, field: &str) -> Option<String> {
        let state = self.state();
        let record = state.registry.get(name)?;
        let order = record
            .descriptor()
            .fields()
            .iter()
            .find(|f| f.field_name() == field)?
            .resolved()?;
        state.registry.by_order(order).map(|r| r.name().to_string())
    }

    /// Descriptors of all objects, in registration order.
    pub fn descriptors(&self) -> Vec<(String, ObjectDescriptor)> {
        self.state()
            .registry
            .iter()
            .map(|r| (r.name().to_string(), r.descriptor().clone()))
            .collect()
    }

    /// The ordering graph the next (or last) injection pass uses.
    pub fn graph(&self) -> DependencyGraph {
        build_graph(&self.state().registry, &self.strategies)
    }

    /// Runs `f` against the registry under the container lock.
    pub fn with_registry<R>(&self, f: impl FnOnce(&Registry) -> R) -> R {
        f(&self.state().registry)
    }

    /// Human-readable wiring report.
    ///
    /// Lists every object in registration order with its type, capabilities,
    /// completion state and, per field, what it asks for and what it got.
    pub fn report(&self) -> String {
        let state = self.state();
        let registry = &state.registry;
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Container: {} object(s), phase {:?}",
            registry.len(),
            state.phase
        );

        for record in registry.iter() {
            let descriptor = record.descriptor();
            let _ = writeln!(
                out,
                "[{}] {} ({}){}",
                record.order(),
                record.name(),
                descriptor.type_key(),
                if record.is_complete() { " complete" } else { "" }
            );

            let capabilities: Vec<&str> = descriptor
                .capabilities()
                .skip(1)
                .map(|key| key.display_name())
                .collect();
            if !capabilities.is_empty() {
                let _ = writeln!(out, "    provides: {}", capabilities.join(", "));
            }

            for field in descriptor.fields() {
                let target = match field.resolved().and_then(|order| registry.by_order(order)) {
                    Some(dependency) => dependency.name().to_string(),
                    None if field.is_required() => "<unresolved>".to_string(),
                    None => "<empty>".to_string(),
                };
                let _ = writeln!(
                    out,
                    "    {}: {} <- {} (name \"{}\", {}, {})",
                    field.field_name(),
                    field.target(),
                    target,
                    field.requested_name(),
                    field.strategy(),
                    if field.is_required() { "required" } else { "optional" }
                );
            }
        }
        out
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("Container")
            .field("phase", &state.phase)
            .field("objects", &state.registry)
            .field("strategies", &self.strategies)
            .finish()
    }
}
