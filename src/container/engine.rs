//! The injection engine: graph construction, ordering, field assignment and hooks.

use std::sync::Arc;

use crate::descriptors::FieldDependency;
use crate::error::{DiError, DiResult};
use crate::graph::DependencyGraph;
use crate::observer::Observers;
use crate::registration::{ObjectRecord, Registry};
use crate::slot::Assign;
use crate::strategy::StrategyRegistry;

/// Builds the ordering graph from every field its strategy resolves by name.
///
/// Fields resolved by type alone add no edge; they are matched during the
/// wiring walk instead.
pub(crate) fn build_graph(registry: &Registry, strategies: &StrategyRegistry) -> DependencyGraph {
    let mut graph = DependencyGraph::with_capacity(registry.len(), registry.field_count());
    graph.ensure_nodes(registry.len());
    for record in registry.iter() {
        for field in record.descriptor().fields() {
            if !strategies.get(field.strategy()).consults_names() {
                continue;
            }
            if let Some(dependency) = registry.get(field.requested_name()) {
                graph.add_edge(record.order(), dependency.order());
            }
        }
    }
    graph
}

/// Runs one injection pass over `registry`.
pub(crate) struct InjectionEngine<'a> {
    strategies: &'a StrategyRegistry,
    observers: &'a Observers,
}

impl<'a> InjectionEngine<'a> {
    pub(crate) fn new(strategies: &'a StrategyRegistry, observers: &'a Observers) -> Self {
        Self { strategies, observers }
    }

    /// Wires every object in dependency order, then runs after-inject hooks in
    /// the same order. Returns the number of objects wired.
    pub(crate) fn run(&self, registry: &mut Registry) -> DiResult<usize> {
        let graph = build_graph(registry, self.strategies);
        let order = graph.topological_order().map_err(|cycle| DiError::CycleDetected {
            path: cycle
                .path
                .iter()
                .filter_map(|&node| registry.by_order(node))
                .map(|record| record.name().to_string())
                .collect(),
        })?;

        for &node in &order {
            if let Some(record) = registry.by_order(node) {
                self.observers.wiring(record.name());
                self.invoke_before(record);
            }
            self.inject_fields(registry, node)?;
        }

        for &node in &order {
            self.invoke_after(registry, node)?;
        }

        Ok(order.len())
    }

    pub(crate) fn invoke_before(&self, record: &ObjectRecord) {
        record.descriptor().invoke_before(record.instance());
    }

    /// Resolves and assigns every declared field of the object at `node`.
    pub(crate) fn inject_fields(&self, registry: &mut Registry, node: usize) -> DiResult<()> {
        let field_count = registry
            .by_order(node)
            .map_or(0, |record| record.descriptor().fields().len());

        for index in 0..field_count {
            let resolved = match registry.by_order(node) {
                Some(record) => self.inject_field(registry, record, &record.descriptor().fields()[index])?,
                None => None,
            };
            if let (Some(order), Some(record)) = (resolved, registry.by_order_mut(node)) {
                record.descriptor_mut().fields_mut()[index].set_resolved(order);
            }
        }
        Ok(())
    }

    // Returns the registration order of the injected object, if any.
    fn inject_field(
        &self,
        registry: &Registry,
        record: &ObjectRecord,
        field: &FieldDependency,
    ) -> DiResult<Option<usize>> {
        let Some(candidate) = self.strategies.resolve(registry, record.name(), field)? else {
            if field.is_required() {
                let requested = if field.requested_name().is_empty() {
                    field.target().display_name().to_string()
                } else {
                    field.requested_name().to_string()
                };
                return Err(DiError::MissingRequiredDependency {
                    object: record.name().to_string(),
                    field: field.field_name().to_string(),
                    requested,
                });
            }
            self.observers.field_skipped(record.name(), field.field_name());
            return Ok(None);
        };

        let mismatch = || DiError::TypeMismatch {
            object: record.name().to_string(),
            field: field.field_name().to_string(),
            expected: field.target().display_name(),
            found: candidate.descriptor().type_key().display_name(),
        };

        let provided = candidate
            .descriptor()
            .provide(candidate.instance(), &field.target())
            .ok_or_else(mismatch)?;

        match field.assign(&**record.instance(), provided) {
            Some(Assign::Set) | Some(Assign::Unchanged) => {
                self.observers
                    .field_injected(record.name(), field.field_name(), candidate.name());
                Ok(Some(candidate.order()))
            }
            Some(Assign::Conflict) => Err(DiError::FieldAlreadyAssigned {
                object: record.name().to_string(),
                field: field.field_name().to_string(),
            }),
            None => Err(mismatch()),
        }
    }

    /// Runs the after-inject hook of the object at `node` and marks it complete.
    pub(crate) fn invoke_after(&self, registry: &mut Registry, node: usize) -> DiResult<()> {
        let Some(record) = registry.by_order(node) else {
            return Ok(());
        };
        record
            .descriptor()
            .invoke_after(record.instance())
            .map_err(|error| DiError::AfterInject {
                object: record.name().to_string(),
                source: Arc::from(error),
            })?;

        if let Some(record) = registry.by_order_mut(node) {
            record.mark_complete();
        }
        Ok(())
    }
}
