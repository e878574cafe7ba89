//! # cowtrie
//!
//! A copy-on-write persistent trie with typed values, and a snapshot store
//! that lets many readers work without ever waiting for a writer's
//! computation.
//!
//! ## Overview
//!
//! - **Persistent trie**: [`PersistentTrie`](persistent::PersistentTrie) maps
//!   byte-string keys to values of any `'static + Send + Sync` type. `put` and
//!   `remove` return new versions that share every untouched subtree with the
//!   old one.
//! - **Snapshot store**: [`SnapshotStore`](store::SnapshotStore) publishes
//!   trie versions one at a time. Reads copy the current handle and never hold
//!   a lock while looking up; writes are serialized and made visible by a
//!   single handle swap.
//!
//! ## Feature Flags
//!
//! - `persistent`: The persistent trie (default)
//! - `store`: The concurrent snapshot store (default)
//! - `loom`: Back the store's locks with `loom` for model checking. A store
//!   built with this feature may only be used inside `loom::model`, so the
//!   store's doctests and thread tests are compiled out; run
//!   `cargo test --test snapshot_store_loom_tests --features loom`
//! - `full`: Enable all default modules
//!
//! ## Example
//!
//! ```rust
//! # #[cfg(not(feature = "loom"))] {
//! use cowtrie::prelude::*;
//!
//! let store = SnapshotStore::new();
//! store.put("table/orders", 42_u64);
//!
//! let snapshot: PersistentTrie = store.snapshot();
//! store.remove("table/orders");
//!
//! assert_eq!(snapshot.get::<u64>("table/orders"), Some(&42));
//! assert!(store.get::<u64>("table/orders").is_none());
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types.
///
/// # Usage
///
/// ```rust
/// use cowtrie::prelude::*;
/// ```
pub mod prelude {
    #[cfg(feature = "persistent")]
    pub use crate::persistent::*;

    #[cfg(feature = "store")]
    pub use crate::store::*;
}

#[cfg(feature = "persistent")]
pub mod persistent;

#[cfg(feature = "store")]
pub mod store;
