//! Type keys used to match injection targets against registered objects.

use std::any::TypeId;
use std::fmt;

/// Static type identity of an injection target or a registered object.
///
/// A key names either a concrete record type (`Database`) or a capability
/// (`dyn Greeter`). Capabilities are unsized, which is why the key is built
/// from `T: ?Sized`.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{key_of_type, TypeKey};
///
/// trait Greeter: Send + Sync {}
/// struct English;
///
/// let concrete = key_of_type::<English>();
/// let capability = key_of_type::<dyn Greeter>();
///
/// assert_ne!(concrete, capability);
/// assert_eq!(concrete, TypeKey::of::<English>());
/// assert!(capability.display_name().contains("Greeter"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key for `T`, sized or not.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Human-readable type name, the `std::any::type_name` result.
    pub fn display_name(&self) -> &'static str {
        self.name
    }
}

// Identity is the TypeId alone; the name is only carried for diagnostics.
impl PartialEq for TypeKey {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl std::hash::Hash for TypeKey {
    #[inline(always)]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[inline(always)]
pub fn key_of_type<T: ?Sized + 'static>() -> TypeKey {
    TypeKey::of::<T>()
}
