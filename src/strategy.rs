//! Field-match strategies: turning a field declaration into a registered object.

use std::collections::HashMap;
use std::sync::Arc;

use crate::descriptors::FieldDependency;
use crate::error::{DiError, DiResult};
use crate::registration::{ObjectRecord, Registry};

pub const NAME_ONLY: &str = "NameOnly";
pub const TYPE_ONLY: &str = "TypeOnly";
pub const NAME_THEN_TYPE: &str = "NameThenType";

/// Strategy used for fields that name none, and for unknown strategy names.
pub const DEFAULT_STRATEGY: &str = NAME_THEN_TYPE;

/// Policy resolving one field declaration against the registered objects.
///
/// `Ok(None)` means "no match" and is not an error; whether a missing match is
/// fatal depends on the field being required.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{DiResult, FieldDependency, FieldMatchStrategy, ObjectRecord, Registry, StrategyRegistry};
///
/// /// Resolves every field to the first registered object.
/// struct First;
///
/// impl FieldMatchStrategy for First {
///     fn name(&self) -> &str { "First" }
///
///     fn find<'a>(
///         &self,
///         objects: &'a Registry,
///         _owner: &str,
///         _dependency: &FieldDependency,
///     ) -> DiResult<Option<&'a ObjectRecord>> {
///         Ok(objects.iter().next())
///     }
/// }
///
/// let strategies = StrategyRegistry::builder().with(First).unwrap().build();
/// assert!(strategies.contains("First"));
/// assert!(strategies.contains("NameOnly"));
/// ```
pub trait FieldMatchStrategy: Send + Sync {
    /// Name fields use to select this strategy.
    fn name(&self) -> &str;

    /// Whether resolution is decided by the requested name when it is registered.
    ///
    /// Fields resolved by such strategies contribute ordering edges to the
    /// dependency graph before injection starts.
    fn consults_names(&self) -> bool {
        false
    }

    /// Finds the object for `dependency`, a field of the object named `owner`.
    fn find<'a>(
        &self,
        objects: &'a Registry,
        owner: &str,
        dependency: &FieldDependency,
    ) -> DiResult<Option<&'a ObjectRecord>>;
}

/// Direct lookup by the requested name.
#[derive(Debug, Default, Clone, Copy)]
pub struct NameOnly;

impl FieldMatchStrategy for NameOnly {
    fn name(&self) -> &str {
        NAME_ONLY
    }

    fn consults_names(&self) -> bool {
        true
    }

    fn find<'a>(
        &self,
        objects: &'a Registry,
        _owner: &str,
        dependency: &FieldDependency,
    ) -> DiResult<Option<&'a ObjectRecord>> {
        Ok(objects.get(dependency.requested_name()))
    }
}

/// The single object assignable to the field's type.
#[derive(Debug, Default, Clone, Copy)]
pub struct TypeOnly;

impl FieldMatchStrategy for TypeOnly {
    fn name(&self) -> &str {
        TYPE_ONLY
    }

    fn find<'a>(
        &self,
        objects: &'a Registry,
        owner: &str,
        dependency: &FieldDependency,
    ) -> DiResult<Option<&'a ObjectRecord>> {
        let target = dependency.target();
        let mut candidates = objects
            .iter()
            .filter(|record| record.descriptor().can_provide(&target));

        let Some(first) = candidates.next() else {
            return Ok(None);
        };
        let rest: Vec<&ObjectRecord> = candidates.collect();
        if rest.is_empty() {
            return Ok(Some(first));
        }

        Err(DiError::AmbiguousMatch {
            object: owner.to_string(),
            field: dependency.field_name().to_string(),
            target: target.display_name(),
            candidates: std::iter::once(first)
                .chain(rest)
                .map(|record| record.name().to_string())
                .collect(),
        })
    }
}

/// Name lookup first, type scan when the name finds nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NameThenType;

impl FieldMatchStrategy for NameThenType {
    fn name(&self) -> &str {
        NAME_THEN_TYPE
    }

    fn consults_names(&self) -> bool {
        true
    }

    fn find<'a>(
        &self,
        objects: &'a Registry,
        owner: &str,
        dependency: &FieldDependency,
    ) -> DiResult<Option<&'a ObjectRecord>> {
        if let Some(found) = NameOnly.find(objects, owner, dependency)? {
            return Ok(Some(found));
        }
        TypeOnly.find(objects, owner, dependency)
    }
}

/// Immutable table of strategies keyed by name.
///
/// Always contains the built-in strategies. Lookups of unknown names fall back
/// to [`DEFAULT_STRATEGY`] silently.
#[derive(Clone)]
pub struct StrategyRegistry {
    strategies: HashMap<String, Arc<dyn FieldMatchStrategy>>,
}

impl StrategyRegistry {
    /// The built-in strategies only.
    pub fn builtin() -> Self {
        let mut strategies: HashMap<String, Arc<dyn FieldMatchStrategy>> = HashMap::with_capacity(3);
        strategies.insert(NAME_ONLY.to_string(), Arc::new(NameOnly));
        strategies.insert(TYPE_ONLY.to_string(), Arc::new(TypeOnly));
        strategies.insert(NAME_THEN_TYPE.to_string(), Arc::new(NameThenType));
        Self { strategies }
    }

    /// Starts from the built-ins and adds custom strategies.
    pub fn builder() -> StrategyRegistryBuilder {
        StrategyRegistryBuilder { registry: Self::builtin() }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.strategies.contains_key(name)
    }

    /// Registered strategy names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.strategies.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Strategy registered as `name`, or the default one.
    pub fn get(&self, name: &str) -> &dyn FieldMatchStrategy {
        match self.strategies.get(name) {
            Some(strategy) => strategy.as_ref(),
            None => self.default_strategy(),
        }
    }

    fn default_strategy(&self) -> &dyn FieldMatchStrategy {
        match self.strategies.get(DEFAULT_STRATEGY) {
            Some(strategy) => strategy.as_ref(),
            // The builder cannot remove built-ins.
            None => &NameThenType,
        }
    }

    /// Resolves `dependency` of `owner` with the strategy it names.
    pub fn resolve<'a>(
        &self,
        objects: &'a Registry,
        owner: &str,
        dependency: &FieldDependency,
    ) -> DiResult<Option<&'a ObjectRecord>> {
        self.get(dependency.strategy()).find(objects, owner, dependency)
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyRegistry").field("strategies", &self.names()).finish()
    }
}

/// Collects custom strategies before the registry is frozen.
pub struct StrategyRegistryBuilder {
    registry: StrategyRegistry,
}

impl StrategyRegistryBuilder {
    /// Adds `strategy`; its name must not be taken yet.
    pub fn with(mut self, strategy: impl FieldMatchStrategy + 'static) -> Result<Self, DiError> {
        let name = strategy.name().to_string();
        if self.registry.strategies.contains_key(&name) {
            return Err(DiError::DuplicateStrategy(name));
        }
        self.registry.strategies.insert(name, Arc::new(strategy));
        Ok(self)
    }

    pub fn build(self) -> StrategyRegistry {
        self.registry
    }
}
