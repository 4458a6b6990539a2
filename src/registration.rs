//! Registered objects and the registry holding them.

use std::collections::HashMap;
use std::fmt;

use crate::descriptors::{AnyArc, ObjectDescriptor};
use crate::error::{DiError, DiResult};

#[cfg(feature = "ahash")]
type NameMap<V> = HashMap<String, V, ahash::RandomState>;
#[cfg(not(feature = "ahash"))]
type NameMap<V> = HashMap<String, V>;

/// A registered object: its name, registration order, instance and descriptor.
pub struct ObjectRecord {
    name: String,
    order: usize,
    instance: AnyArc,
    descriptor: ObjectDescriptor,
    complete: bool,
}

impl ObjectRecord {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registration order; also the object's node id in the dependency graph.
    pub fn order(&self) -> usize {
        self.order
    }

    pub fn instance(&self) -> &AnyArc {
        &self.instance
    }

    pub fn descriptor(&self) -> &ObjectDescriptor {
        &self.descriptor
    }

    pub(crate) fn descriptor_mut(&mut self) -> &mut ObjectDescriptor {
        &mut self.descriptor
    }

    /// Whether the object was fully wired and its after-inject hook succeeded.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub(crate) fn mark_complete(&mut self) {
        self.complete = true;
    }
}

impl fmt::Debug for ObjectRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRecord")
            .field("name", &self.name)
            .field("order", &self.order)
            .field("type", &self.descriptor.type_key().display_name())
            .field("complete", &self.complete)
            .finish()
    }
}

/// All registered objects, indexed by name and by registration order.
pub struct Registry {
    records: Vec<ObjectRecord>,
    by_name: NameMap<usize>,
}

impl Registry {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            by_name: NameMap::<usize>::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Stores a new record and returns its registration order.
    pub(crate) fn insert(
        &mut self,
        name: String,
        instance: AnyArc,
        descriptor: ObjectDescriptor,
    ) -> DiResult<usize> {
        if self.by_name.contains_key(&name) {
            return Err(DiError::DuplicateName(name));
        }
        let order = self.records.len();
        self.by_name.insert(name.clone(), order);
        self.records.push(ObjectRecord {
            name,
            order,
            instance,
            descriptor,
            complete: false,
        });
        Ok(order)
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&ObjectRecord> {
        self.by_name.get(name).map(|&order| &self.records[order])
    }

    #[inline]
    pub fn by_order(&self, order: usize) -> Option<&ObjectRecord> {
        self.records.get(order)
    }

    pub(crate) fn by_order_mut(&mut self, order: usize) -> Option<&mut ObjectRecord> {
        self.records.get_mut(order)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Records in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ObjectRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total number of declared fields across all records.
    pub fn field_count(&self) -> usize {
        self.records.iter().map(|r| r.descriptor.fields().len()).sum()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.records.iter()).finish()
    }
}
