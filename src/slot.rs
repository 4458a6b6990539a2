//! Set-once field slots that the container injects into.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

#[cfg(feature = "once-cell")]
use once_cell::sync::OnceCell as SlotCell;
#[cfg(not(feature = "once-cell"))]
use std::sync::OnceLock as SlotCell;

/// Outcome of assigning a value into an [`Inject`] slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Assign {
    /// The slot was empty and now holds the value
    Set,
    /// The slot already held this exact value
    Unchanged,
    /// The slot already held a different value
    Conflict,
}

/// An injectable field.
///
/// Holds an `Arc<T>` once the container wired it. `T` is either a concrete
/// record type or a capability trait object such as `dyn Greeter`.
///
/// Reading an unwired slot through `Deref` panics, the same way dereferencing a
/// missing reference would. Use [`get`](Inject::get) for optional fields.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::Inject;
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn hello(&self) -> String;
/// }
///
/// struct Fake;
/// impl Greeter for Fake {
///     fn hello(&self) -> String { "fake".into() }
/// }
///
/// let empty: Inject<dyn Greeter> = Inject::new();
/// assert!(!empty.is_set());
///
/// // Prefilled slots are handy for unit tests that skip the container.
/// let filled = Inject::from(Arc::new(Fake) as Arc<dyn Greeter>);
/// assert_eq!(filled.hello(), "fake");
/// ```
pub struct Inject<T: ?Sized> {
    cell: SlotCell<Arc<T>>,
}

impl<T: ?Sized> Inject<T> {
    pub fn new() -> Self {
        Self { cell: SlotCell::new() }
    }

    /// The injected value, if any.
    #[inline]
    pub fn get(&self) -> Option<&Arc<T>> {
        self.cell.get()
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Assigns `value`, treating a repeat of the same `Arc` as a no-op.
    pub(crate) fn assign(&self, value: Arc<T>) -> Assign {
        if let Some(current) = self.cell.get() {
            return if Arc::ptr_eq(current, &value) {
                Assign::Unchanged
            } else {
                Assign::Conflict
            };
        }
        match self.cell.set(value) {
            Ok(()) => Assign::Set,
            // Lost a race against another writer; compare against the winner.
            Err(value) => match self.cell.get() {
                Some(current) if Arc::ptr_eq(current, &value) => Assign::Unchanged,
                _ => Assign::Conflict,
            },
        }
    }
}

impl<T: ?Sized> Default for Inject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> From<Arc<T>> for Inject<T> {
    fn from(value: Arc<T>) -> Self {
        let slot = Self::new();
        let _ = slot.cell.set(value);
        slot
    }
}

impl<T: ?Sized> Deref for Inject<T> {
    type Target = T;

    fn deref(&self) -> &T {
        match self.cell.get() {
            Some(value) => value,
            None => panic!(
                "Inject<{}> read before the container wired it",
                std::any::type_name::<T>()
            ),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Inject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inject")
            .field("type", &std::any::type_name::<T>())
            .field("set", &self.is_set())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_is_idempotent_for_the_same_arc() {
        let slot: Inject<u32> = Inject::new();
        let value = Arc::new(7u32);

        assert_eq!(slot.assign(value.clone()), Assign::Set);
        assert_eq!(slot.assign(value.clone()), Assign::Unchanged);
        assert_eq!(*slot, 7);
        assert!(Arc::ptr_eq(slot.get().unwrap(), &value));
    }

    #[test]
    fn assign_rejects_a_different_arc() {
        let slot = Inject::from(Arc::new(1u32));
        assert_eq!(slot.assign(Arc::new(1u32)), Assign::Conflict);
        assert_eq!(*slot, 1);
    }

    #[test]
    #[should_panic(expected = "read before the container wired it")]
    fn deref_of_empty_slot_panics() {
        let slot: Inject<String> = Inject::new();
        let _ = slot.len();
    }
}
