//! Lock primitives used by the snapshot store.
//!
//! Normal builds use `parking_lot`. With the `loom` feature the same API is
//! backed by `loom::sync::Mutex`, so the publish protocol can be explored by
//! the loom model checker. Such a lock panics outside `loom::model`;
//! code that builds a store outside a model is gated on
//! `not(feature = "loom")`.

#[cfg(not(feature = "loom"))]
pub(crate) use parking_lot::Mutex;

#[cfg(feature = "loom")]
pub(crate) use self::loom_mutex::Mutex;

#[cfg(feature = "loom")]
mod loom_mutex {
    use std::sync::PoisonError;

    /// `loom::sync::Mutex` with the non-poisoning `lock` signature of
    /// `parking_lot::Mutex`.
    pub(crate) struct Mutex<T>(loom::sync::Mutex<T>);

    impl<T> Mutex<T> {
        pub(crate) fn new(value: T) -> Self {
            Self(loom::sync::Mutex::new(value))
        }

        pub(crate) fn lock(&self) -> loom::sync::MutexGuard<'_, T> {
            self.0.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }
}
