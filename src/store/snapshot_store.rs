//! A concurrent key-value store built on [`PersistentTrie`] snapshots.
//!
//! [`SnapshotStore`] holds the current trie version behind two locks:
//!
//! - the *publish lock* guards the handle to the current version and is only
//!   ever held long enough to copy or replace that handle;
//! - the *writer lock* admits one `put`/`remove` at a time.
//!
//! Readers copy the handle and then work on their private snapshot without any
//! lock held. Writers copy the handle, derive the next version with no lock
//! but the writer lock held, and publish it with a single handle swap. Since
//! tries are immutable, a reader can only ever observe a fully built version.

use std::any::Any;
use std::fmt;

use crate::persistent::PersistentTrie;

use super::guard::ValueGuard;
use super::sync::Mutex;

/// The current trie version and the number of publishes that produced it.
struct Published {
    trie: PersistentTrie,
    version: u64,
}

/// A thread-safe store whose readers never wait for a writer's computation.
///
/// # Concurrency
///
/// - `get` takes the publish lock only to clone the current handle (O(1)),
///   then looks up the key on that private snapshot.
/// - `put` and `remove` are totally ordered by the writer lock. The new
///   version is computed outside the publish lock, so readers are blocked at
///   most for the duration of one handle swap.
/// - A read that overlaps a write observes either the version before the
///   write or the version after it, never a mixture.
///
/// # Examples
///
/// ```rust
/// # #[cfg(not(feature = "loom"))] {
/// use cowtrie::store::SnapshotStore;
/// use std::sync::Arc;
/// use std::thread;
///
/// let store = Arc::new(SnapshotStore::new());
///
/// let writers: Vec<_> = (0..4_u32)
///     .map(|index| {
///         let store = Arc::clone(&store);
///         thread::spawn(move || store.put(format!("key{index}"), index))
///     })
///     .collect();
///
/// for writer in writers {
///     writer.join().unwrap();
/// }
///
/// assert_eq!(store.version(), 4);
/// assert_eq!(store.get::<u32>("key2").as_deref(), Some(&2));
/// # }
/// ```
pub struct SnapshotStore {
    label: Option<String>,
    current: Mutex<Published>,
    writer: Mutex<()>,
}

impl SnapshotStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::from_trie(PersistentTrie::new())
    }

    /// Creates an empty store whose log events carry `label`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(not(feature = "loom"))] {
    /// use cowtrie::store::SnapshotStore;
    ///
    /// let store = SnapshotStore::named("catalog");
    /// assert_eq!(store.label(), Some("catalog"));
    /// # }
    /// ```
    #[must_use]
    pub fn named(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::new()
        }
    }

    /// Creates a store whose first published version is `trie`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(not(feature = "loom"))] {
    /// use cowtrie::persistent::PersistentTrie;
    /// use cowtrie::store::SnapshotStore;
    ///
    /// let trie = PersistentTrie::new().put("seed", 1_u8);
    /// let store = SnapshotStore::from_trie(trie);
    /// assert_eq!(store.get::<u8>("seed").as_deref(), Some(&1));
    /// assert_eq!(store.version(), 0);
    /// # }
    /// ```
    #[must_use]
    pub fn from_trie(trie: PersistentTrie) -> Self {
        Self {
            label: None,
            current: Mutex::new(Published { trie, version: 0 }),
            writer: Mutex::new(()),
        }
    }

    /// Returns the label given to [`named`](Self::named).
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    fn label_field(&self) -> &str {
        self.label.as_deref().unwrap_or("-")
    }

    /// Copies the handle to the current version under the publish lock.
    fn load(&self) -> (PersistentTrie, u64) {
        let published = self.current.lock();
        (published.trie.clone(), published.version)
    }

    /// Returns the current version of the store.
    ///
    /// The snapshot is immutable; later writes to the store do not affect it.
    /// Use it to read several keys from one consistent version.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(not(feature = "loom"))] {
    /// use cowtrie::store::SnapshotStore;
    ///
    /// let store = SnapshotStore::new();
    /// store.put("a", 1_i32);
    ///
    /// let snapshot = store.snapshot();
    /// store.put("a", 2_i32);
    ///
    /// assert_eq!(snapshot.get::<i32>("a"), Some(&1));
    /// assert_eq!(store.snapshot().get::<i32>("a"), Some(&2));
    /// # }
    /// ```
    #[must_use]
    pub fn snapshot(&self) -> PersistentTrie {
        self.load().0
    }

    /// Returns how many versions have been published since creation.
    ///
    /// Every `put` and every `remove`, including removes of absent keys,
    /// publishes exactly one version.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.current.lock().version
    }

    /// Looks up `key` in the current version.
    ///
    /// Returns `None` if the key is absent or holds a value of another type.
    /// The lookup itself runs without any lock held.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(not(feature = "loom"))] {
    /// use cowtrie::store::SnapshotStore;
    ///
    /// let store = SnapshotStore::new();
    /// store.put("name", String::from("orders"));
    ///
    /// let guard = store.get::<String>("name").unwrap();
    /// assert_eq!(guard.as_str(), "orders");
    /// assert!(store.get::<u32>("name").is_none());
    /// # }
    /// ```
    #[must_use]
    pub fn get<T: Any + Send + Sync>(&self, key: impl AsRef<[u8]>) -> Option<ValueGuard<T>> {
        let snapshot = self.snapshot();
        let value = snapshot.get_shared::<T>(key)?;
        Some(ValueGuard::new(snapshot, value))
    }

    /// Returns `true` if a value of any type is stored under `key`.
    #[must_use]
    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> bool {
        self.snapshot().contains_key(key)
    }

    /// Stores `value` under `key` and publishes the new version.
    ///
    /// Blocks while another writer is active.
    pub fn put<T: Any + Send + Sync>(&self, key: impl AsRef<[u8]>, value: T) {
        let key = key.as_ref();
        self.write("put", key.len(), |base| base.put(key, value));
    }

    /// Removes the value stored under `key` and publishes the new version.
    ///
    /// Removing an absent key is not an error; it republishes the current
    /// version unchanged.
    pub fn remove(&self, key: impl AsRef<[u8]>) {
        let key = key.as_ref();
        self.write("remove", key.len(), |base| {
            let next = base.remove(key);
            if next.ptr_eq(base) {
                tracing::debug!(
                    store = self.label_field(),
                    key_length = key.len(),
                    "remove found no value, version unchanged"
                );
            }
            next
        });
    }

    /// Runs one writer cycle: load, compute, publish.
    fn write(
        &self,
        operation: &'static str,
        key_length: usize,
        compute: impl FnOnce(&PersistentTrie) -> PersistentTrie,
    ) {
        let _writer = self.writer.lock();

        let (base, _) = self.load();
        let next = compute(&base);

        let (previous, version) = {
            let mut published = self.current.lock();
            published.version += 1;
            (
                std::mem::replace(&mut published.trie, next),
                published.version,
            )
        };
        // The replaced handle is released here, outside the publish lock.
        drop(previous);

        tracing::debug!(
            store = self.label_field(),
            operation,
            key_length,
            version,
            "published snapshot"
        );
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl From<PersistentTrie> for SnapshotStore {
    fn from(trie: PersistentTrie) -> Self {
        Self::from_trie(trie)
    }
}

impl fmt::Debug for SnapshotStore {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (trie, version) = self.load();
        formatter
            .debug_struct("SnapshotStore")
            .field("label", &self.label)
            .field("version", &version)
            .field("current", &trie)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_new_store_is_empty() {
        let store = SnapshotStore::new();
        assert!(store.snapshot().is_empty());
        assert_eq!(store.version(), 0);
        assert!(store.label().is_none());
    }

    #[rstest]
    fn test_every_write_publishes_one_version() {
        let store = SnapshotStore::new();
        store.put("a", 1_u32);
        store.put("a", 2_u32);
        store.remove("a");
        store.remove("a");
        assert_eq!(store.version(), 4);
    }

    #[rstest]
    fn test_remove_of_absent_key_republishes_same_root() {
        let store = SnapshotStore::new();
        store.put("a", 1_u32);
        let before = store.snapshot();
        store.remove("b");
        assert!(store.snapshot().ptr_eq(&before));
    }

    #[rstest]
    fn test_publish_replaces_handle_and_keeps_old_snapshot_valid() {
        let store = SnapshotStore::new();
        store.put("a", 1_u32);
        let before = store.snapshot();
        store.put("b", 2_u32);
        assert!(!store.snapshot().ptr_eq(&before));
        assert_eq!(before.get::<u32>("b"), None);
        assert_eq!(before.get::<u32>("a"), Some(&1));
    }

    #[rstest]
    fn test_named_store_keeps_label_and_starts_empty() {
        let store = SnapshotStore::named("catalog");
        assert_eq!(store.label(), Some("catalog"));
        assert!(store.snapshot().is_empty());
    }

    #[rstest]
    fn test_debug_includes_label_and_version() {
        let store = SnapshotStore::named("catalog");
        store.put("k", 1_u8);
        let rendered = format!("{store:?}");
        assert!(rendered.contains("catalog"));
        assert!(rendered.contains("version: 1"));
    }
}
