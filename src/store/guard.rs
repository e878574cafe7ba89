//! Guards that keep a looked-up value's snapshot alive.

use std::fmt;
use std::ops::Deref;

use crate::persistent::{PersistentTrie, ReferenceCounter};

/// A value read from a [`SnapshotStore`](super::SnapshotStore), bundled with
/// the trie snapshot it was found in.
///
/// The guard keeps that snapshot alive, so the value stays valid even after
/// writers have published newer versions of the store. It dereferences to the
/// value.
///
/// # Examples
///
/// ```rust
/// # #[cfg(not(feature = "loom"))] {
/// use cowtrie::store::SnapshotStore;
///
/// let store = SnapshotStore::new();
/// store.put("answer", 42_u32);
///
/// let guard = store.get::<u32>("answer").unwrap();
/// store.remove("answer");
///
/// // The guard still sees the snapshot it was read from.
/// assert_eq!(*guard, 42);
/// assert!(store.get::<u32>("answer").is_none());
/// # }
/// ```
pub struct ValueGuard<T> {
    snapshot: PersistentTrie,
    value: ReferenceCounter<T>,
}

impl<T> ValueGuard<T> {
    pub(crate) const fn new(snapshot: PersistentTrie, value: ReferenceCounter<T>) -> Self {
        Self { snapshot, value }
    }

    /// Returns a reference to the guarded value.
    #[inline]
    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Returns the snapshot the value was read from.
    #[inline]
    #[must_use]
    pub const fn snapshot(&self) -> &PersistentTrie {
        &self.snapshot
    }
}

impl<T> Deref for ValueGuard<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> Clone for ValueGuard<T> {
    fn clone(&self) -> Self {
        Self {
            snapshot: self.snapshot.clone(),
            value: ReferenceCounter::clone(&self.value),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ValueGuard<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_tuple("ValueGuard")
            .field(&*self.value)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn guard_for(key: &str, value: u32) -> ValueGuard<u32> {
        let snapshot = PersistentTrie::new().put(key, value);
        let shared = snapshot.get_shared::<u32>(key).unwrap();
        ValueGuard::new(snapshot, shared)
    }

    #[rstest]
    fn test_guard_derefs_to_value() {
        let guard = guard_for("k", 7);
        assert_eq!(*guard, 7);
        assert_eq!(guard.value(), &7);
    }

    #[rstest]
    fn test_guard_exposes_its_snapshot() {
        let guard = guard_for("k", 7);
        assert_eq!(guard.snapshot().get::<u32>("k"), Some(&7));
    }

    #[rstest]
    fn test_cloned_guard_shares_snapshot() {
        let guard = guard_for("k", 7);
        let cloned = guard.clone();
        assert!(guard.snapshot().ptr_eq(cloned.snapshot()));
        assert!(std::ptr::eq(guard.value(), cloned.value()));
    }

    #[rstest]
    fn test_debug_shows_value() {
        assert_eq!(format!("{:?}", guard_for("k", 3)), "ValueGuard(3)");
    }
}
