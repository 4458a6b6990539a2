//! Core traits for injectable objects.

mod injectable;
mod lifecycle;

pub use injectable::Injectable;
pub use lifecycle::{AfterInject, BeforeInject};
