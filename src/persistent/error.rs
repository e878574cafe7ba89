//! Diagnostic lookup errors.

use thiserror::Error;

/// Why a typed lookup in a [`PersistentTrie`](super::PersistentTrie) found
/// nothing.
///
/// Plain [`get`](super::PersistentTrie::get) folds both cases into `None`;
/// [`try_get`](super::PersistentTrie::try_get) reports which one happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LookupError {
    /// No value is stored under the key.
    #[error("no value is stored under the requested key")]
    Missing,
    /// A value is stored under the key, but with a different type.
    #[error("stored value has type `{stored}`, but `{requested}` was requested")]
    TypeMismatch {
        /// Name of the type the caller asked for.
        requested: &'static str,
        /// Name of the type that is actually stored.
        stored: &'static str,
    },
}
