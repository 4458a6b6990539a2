//! Object descriptors: the dependency declarations of a registered object.
//!
//! Rust has no runtime field reflection, so an object's shape is captured by
//! its [`Injectable::declare`] implementation. [`Describer`] runs those
//! declarations against a type-erased instance and produces the immutable
//! [`ObjectDescriptor`] the container works from.

use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{DiError, DiResult, DynError};
use crate::key::TypeKey;
use crate::slot::{Assign, Inject};
use crate::strategy::DEFAULT_STRATEGY;
use crate::tag::FieldTag;
use crate::traits::{AfterInject, BeforeInject, Injectable};

/// Type-erased handle to a registered instance.
pub type AnyArc = Arc<dyn Any + Send + Sync>;

// Boxed `Arc<U>` ready to be stored into an `Inject<U>` slot.
pub(crate) type Provided = Box<dyn Any + Send + Sync>;

type CastFn = Arc<dyn Fn(&AnyArc) -> Option<Provided> + Send + Sync>;
type AssignFn = Arc<dyn Fn(&(dyn Any + Send + Sync), Provided) -> Option<Assign> + Send + Sync>;
type BeforeFn = Arc<dyn Fn(&(dyn Any + Send + Sync)) + Send + Sync>;
type AfterFn = Arc<dyn Fn(&(dyn Any + Send + Sync)) -> Result<(), DynError> + Send + Sync>;

/// One injectable field of a registered object.
#[derive(Clone)]
pub struct FieldDependency {
    field_name: &'static str,
    target: TypeKey,
    requested_name: String,
    required: bool,
    strategy: String,
    resolved: Option<usize>,
    assign: AssignFn,
}

impl FieldDependency {
    pub fn field_name(&self) -> &'static str {
        self.field_name
    }

    /// Static type the field accepts.
    pub fn target(&self) -> TypeKey {
        self.target
    }

    /// Dependency name from the declaration; may be empty.
    pub fn requested_name(&self) -> &str {
        &self.requested_name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    /// Registration order of the object injected into this field, once wired.
    pub fn resolved(&self) -> Option<usize> {
        self.resolved
    }

    pub(crate) fn set_resolved(&mut self, order: usize) {
        self.resolved = Some(order);
    }

    /// Stores `provided` into this field of `owner`.
    ///
    /// `None` means `owner` or `provided` had an unexpected type.
    pub(crate) fn assign(&self, owner: &(dyn Any + Send + Sync), provided: Provided) -> Option<Assign> {
        (self.assign)(owner, provided)
    }
}

impl fmt::Debug for FieldDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDependency")
            .field("field_name", &self.field_name)
            .field("target", &self.target.display_name())
            .field("requested_name", &self.requested_name)
            .field("required", &self.required)
            .field("strategy", &self.strategy)
            .field("resolved", &self.resolved)
            .finish()
    }
}

#[derive(Clone)]
struct Capability {
    key: TypeKey,
    cast: CastFn,
}

/// Immutable description of a registered object.
///
/// Computed once at registration. Holds the object's concrete type, the
/// capabilities it can be injected as, its injectable fields in declaration
/// order and the lifecycle hooks it opted into.
#[derive(Clone)]
pub struct ObjectDescriptor {
    type_key: TypeKey,
    fields: Vec<FieldDependency>,
    capabilities: Vec<Capability>,
    before: Option<BeforeFn>,
    after: Option<AfterFn>,
}

impl ObjectDescriptor {
    /// Concrete type of the described instance.
    pub fn type_key(&self) -> TypeKey {
        self.type_key
    }

    pub fn fields(&self) -> &[FieldDependency] {
        &self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> &mut [FieldDependency] {
        &mut self.fields
    }

    /// Every type this object can be injected as, concrete type first.
    pub fn capabilities(&self) -> impl Iterator<Item = TypeKey> + '_ {
        self.capabilities.iter().map(|c| c.key)
    }

    /// Whether the described instance is assignable to `target`.
    pub fn can_provide(&self, target: &TypeKey) -> bool {
        self.capabilities.iter().any(|c| &c.key == target)
    }

    pub fn has_before_hook(&self) -> bool {
        self.before.is_some()
    }

    pub fn has_after_hook(&self) -> bool {
        self.after.is_some()
    }

    /// Views `instance` as `target`, boxed for a slot assignment.
    pub(crate) fn provide(&self, instance: &AnyArc, target: &TypeKey) -> Option<Provided> {
        let capability = self.capabilities.iter().find(|c| &c.key == target)?;
        (capability.cast)(instance)
    }

    pub(crate) fn invoke_before(&self, instance: &AnyArc) {
        if let Some(hook) = &self.before {
            hook(instance.as_ref());
        }
    }

    pub(crate) fn invoke_after(&self, instance: &AnyArc) -> Result<(), DynError> {
        match &self.after {
            Some(hook) => hook(instance.as_ref()),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for ObjectDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectDescriptor")
            .field("type", &self.type_key.display_name())
            .field("fields", &self.fields)
            .field(
                "capabilities",
                &self.capabilities.iter().map(|c| c.key.display_name()).collect::<Vec<_>>(),
            )
            .field("before_hook", &self.before.is_some())
            .field("after_hook", &self.after.is_some())
            .finish()
    }
}

/// Declaration builder handed to [`Injectable::declare`].
pub struct Declarations<T> {
    fields: Vec<FieldDependency>,
    capabilities: Vec<Capability>,
    before: Option<BeforeFn>,
    after: Option<AfterFn>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Injectable> Declarations<T> {
    fn new() -> Self {
        Self {
            fields: Vec::new(),
            capabilities: vec![Capability {
                key: TypeKey::of::<T>(),
                cast: Arc::new(|instance: &AnyArc| {
                    let typed = instance.clone().downcast::<T>().ok()?;
                    Some(Box::new(typed) as Provided)
                }),
            }],
            before: None,
            after: None,
            _marker: PhantomData,
        }
    }

    /// Declares an injectable field.
    ///
    /// The field starts with an empty dependency name, required, using the
    /// default strategy; refine it through the returned [`FieldBuilder`].
    pub fn field<U>(&mut self, field_name: &'static str, accessor: fn(&T) -> &Inject<U>) -> FieldBuilder<'_>
    where
        U: ?Sized + Send + Sync + 'static,
    {
        let assign: AssignFn = Arc::new(move |owner: &(dyn Any + Send + Sync), provided: Provided| {
            let owner = owner.downcast_ref::<T>()?;
            let value = provided.downcast::<Arc<U>>().ok()?;
            Some(accessor(owner).assign(*value))
        });
        self.fields.push(FieldDependency {
            field_name,
            target: TypeKey::of::<U>(),
            requested_name: String::new(),
            required: true,
            strategy: DEFAULT_STRATEGY.to_string(),
            resolved: None,
            assign,
        });
        let last = self.fields.len() - 1;
        FieldBuilder { field: &mut self.fields[last] }
    }

    /// Declares a field from a struct-tag style annotation.
    ///
    /// Without an `inject-name` key the field is not injectable and nothing is
    /// declared. See [`FieldTag`] for the format.
    pub fn tagged<U>(&mut self, field_name: &'static str, accessor: fn(&T) -> &Inject<U>, tag: &str) -> &mut Self
    where
        U: ?Sized + Send + Sync + 'static,
    {
        if let Some(tag) = FieldTag::parse(tag) {
            self.field(field_name, accessor)
                .named(tag.name)
                .required(tag.required)
                .strategy(tag.strategy);
        }
        self
    }

    /// Declares a capability this object can be injected as.
    pub fn provides<C>(&mut self, cast: fn(Arc<T>) -> Arc<C>) -> &mut Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let key = TypeKey::of::<C>();
        if self.capabilities.iter().any(|c| c.key == key) {
            return self;
        }
        self.capabilities.push(Capability {
            key,
            cast: Arc::new(move |instance: &AnyArc| {
                let typed = instance.clone().downcast::<T>().ok()?;
                Some(Box::new(cast(typed)) as Provided)
            }),
        });
        self
    }

    /// Opts into the [`BeforeInject`] hook.
    pub fn on_before_inject(&mut self) -> &mut Self
    where
        T: BeforeInject,
    {
        self.before = Some(Arc::new(|instance: &(dyn Any + Send + Sync)| {
            if let Some(this) = instance.downcast_ref::<T>() {
                this.before_inject();
            }
        }));
        self
    }

    /// Opts into the [`AfterInject`] hook.
    pub fn on_after_inject(&mut self) -> &mut Self
    where
        T: AfterInject,
    {
        self.after = Some(Arc::new(|instance: &(dyn Any + Send + Sync)| {
            match instance.downcast_ref::<T>() {
                Some(this) => this.after_inject(),
                None => Ok(()),
            }
        }));
        self
    }

    fn finish(self) -> ObjectDescriptor {
        ObjectDescriptor {
            type_key: TypeKey::of::<T>(),
            fields: self.fields,
            capabilities: self.capabilities,
            before: self.before,
            after: self.after,
        }
    }
}

/// Refines the most recently declared field.
pub struct FieldBuilder<'a> {
    field: &'a mut FieldDependency,
}

impl<'a> FieldBuilder<'a> {
    /// Name of the registered object this field depends on.
    pub fn named(self, name: impl Into<String>) -> Self {
        self.field.requested_name = name.into();
        self
    }

    /// Leaves the field empty instead of failing when nothing matches.
    pub fn optional(self) -> Self {
        self.required(false)
    }

    pub fn required(self, required: bool) -> Self {
        self.field.required = required;
        self
    }

    /// Field-match strategy by name; unknown names fall back to the default.
    pub fn strategy(self, strategy: impl Into<String>) -> Self {
        self.field.strategy = strategy.into();
        self
    }
}

/// Produces [`ObjectDescriptor`]s for instances of one type.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{AnyArc, DiError, Describer, Injectable};
/// use std::sync::Arc;
///
/// struct Plain;
/// impl Injectable for Plain {}
///
/// let describer = Describer::of::<Plain>();
/// let ok: AnyArc = Arc::new(Plain);
/// assert!(describer.describe("plain", &ok).is_ok());
///
/// let wrong: AnyArc = Arc::new(42u32);
/// assert!(matches!(describer.describe("n", &wrong), Err(DiError::InvalidInstanceKind { .. })));
/// ```
#[derive(Clone, Copy)]
pub struct Describer {
    type_key: TypeKey,
    describe: fn(&str, &AnyArc) -> DiResult<ObjectDescriptor>,
}

impl Describer {
    pub fn of<T: Injectable>() -> Self {
        Self {
            type_key: TypeKey::of::<T>(),
            describe: describe_as::<T>,
        }
    }

    /// The type this describer accepts.
    pub fn type_key(&self) -> TypeKey {
        self.type_key
    }

    /// Describes `instance`, which is registered as `name`.
    pub fn describe(&self, name: &str, instance: &AnyArc) -> DiResult<ObjectDescriptor> {
        (self.describe)(name, instance)
    }
}

impl fmt::Debug for Describer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Describer").field("type", &self.type_key.display_name()).finish()
    }
}

fn describe_as<T: Injectable>(name: &str, instance: &AnyArc) -> DiResult<ObjectDescriptor> {
    let invalid = |reason: String| DiError::InvalidInstanceKind {
        name: name.to_string(),
        reason,
    };

    if !(**instance).is::<T>() {
        return Err(invalid(format!(
            "instance is not a '{}'",
            std::any::type_name::<T>()
        )));
    }

    let mut decl = Declarations::<T>::new();
    T::declare(&mut decl);

    let mut seen = HashSet::new();
    for field in &decl.fields {
        if field.field_name.is_empty() {
            return Err(invalid("a field was declared without a name".to_string()));
        }
        if !seen.insert(field.field_name) {
            return Err(invalid(format!("field '{}' is declared twice", field.field_name)));
        }
    }

    Ok(decl.finish())
}
