//! Container-wide exclusive lock.

#[cfg(feature = "parking-lot")]
pub(crate) use parking_lot::MutexGuard as StateGuard;
#[cfg(not(feature = "parking-lot"))]
pub(crate) use std::sync::MutexGuard as StateGuard;

/// Mutex over the container state, std or parking_lot depending on features.
pub(crate) struct StateLock<T> {
    #[cfg(feature = "parking-lot")]
    inner: parking_lot::Mutex<T>,
    #[cfg(not(feature = "parking-lot"))]
    inner: std::sync::Mutex<T>,
}

impl<T> StateLock<T> {
    pub(crate) fn new(value: T) -> Self {
        Self {
            #[cfg(feature = "parking-lot")]
            inner: parking_lot::Mutex::new(value),
            #[cfg(not(feature = "parking-lot"))]
            inner: std::sync::Mutex::new(value),
        }
    }

    /// Acquires the lock.
    ///
    /// A poisoned std mutex is recovered: the state is only ever observed
    /// between complete mutations, so a panic in a user hook leaves it usable.
    pub(crate) fn lock(&self) -> StateGuard<'_, T> {
        #[cfg(feature = "parking-lot")]
        {
            self.inner.lock()
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
        }
    }
}
