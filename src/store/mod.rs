//! Concurrent snapshot store.
//!
//! - [`SnapshotStore`]: publishes successive [`PersistentTrie`] versions;
//!   readers work on snapshots without blocking on writers
//! - [`ValueGuard`]: a looked-up value plus the snapshot that keeps it alive
//!
//! # Examples
//!
//! ```rust
//! # #[cfg(not(feature = "loom"))] {
//! use cowtrie::store::SnapshotStore;
//!
//! let store = SnapshotStore::named("catalog");
//! store.put("cat", 1_u32);
//! store.put("car", 2_u32);
//! store.put("cart", 3_u32);
//!
//! store.remove("car");
//!
//! assert!(store.get::<u32>("car").is_none());
//! assert_eq!(store.get::<u32>("cat").as_deref(), Some(&1));
//! assert_eq!(store.get::<u32>("cart").as_deref(), Some(&3));
//! # }
//! ```
//!
//! [`PersistentTrie`]: crate::persistent::PersistentTrie

mod guard;
mod snapshot_store;
mod sync;

pub use guard::ValueGuard;
pub use snapshot_store::SnapshotStore;

static_assertions::assert_impl_all!(SnapshotStore: Send, Sync);
static_assertions::assert_impl_all!(ValueGuard<String>: Send, Sync, Clone);
