//! Internal implementation details.

pub(crate) mod lock;

pub(crate) use lock::{StateGuard, StateLock};
