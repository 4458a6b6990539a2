//! The declaration trait implemented by every registered object.

use crate::descriptors::Declarations;

/// An object the container can register and wire.
///
/// `declare` states, once per type, which fields take dependencies, which
/// capabilities the object can be injected as, and which lifecycle hooks it
/// opts into. Leaf objects with nothing to declare can rely on the default.
///
/// # Examples
///
/// ```
/// use ferrous_inject::{Container, Declarations, Inject, Injectable};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn hello(&self) -> String;
/// }
///
/// struct English;
/// impl Greeter for English {
///     fn hello(&self) -> String { "hello".into() }
/// }
/// impl Injectable for English {
///     fn declare(decl: &mut Declarations<Self>) {
///         decl.provides::<dyn Greeter>(|this| this as Arc<dyn Greeter>);
///     }
/// }
///
/// #[derive(Default)]
/// struct Door {
///     greeter: Inject<dyn Greeter>,
/// }
/// impl Injectable for Door {
///     fn declare(decl: &mut Declarations<Self>) {
///         decl.field("greeter", |s| &s.greeter).named("english");
///     }
/// }
///
/// let door = Arc::new(Door::default());
/// let container = Container::new();
/// container.register("door", door.clone()).unwrap();
/// container.register("english", Arc::new(English)).unwrap();
/// container.inject().unwrap();
///
/// assert_eq!(door.greeter.hello(), "hello");
/// ```
pub trait Injectable: Send + Sync + Sized + 'static {
    /// Declares dependencies, capabilities and hooks for `Self`.
    fn declare(decl: &mut Declarations<Self>) {
        let _ = decl;
    }
}
