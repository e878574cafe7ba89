//! Persistent (immutable) trie.
//!
//! This module provides a copy-on-write trie that uses structural sharing to
//! minimize copying:
//!
//! - [`PersistentTrie`]: handle to an immutable trie version
//! - [`TrieNode`]: immutable node shared between versions
//! - [`LookupError`]: why a typed lookup came back empty
//!
//! # Structural Sharing
//!
//! `put` and `remove` rebuild only the nodes on the path from the root to the
//! key. Every other subtree is reused by reference, so deriving a new version
//! costs O(k) regardless of how many keys the trie holds, and older versions
//! stay valid for as long as someone holds them.
//!
//! # Examples
//!
//! ```rust
//! use cowtrie::persistent::PersistentTrie;
//!
//! let base = PersistentTrie::new()
//!     .put("users", 10_u64)
//!     .put("user", String::from("admin"));
//!
//! let updated = base.put("users", 11_u64);
//!
//! assert_eq!(base.get::<u64>("users"), Some(&10));    // Original unchanged
//! assert_eq!(updated.get::<u64>("users"), Some(&11)); // New version
//!
//! // Values of different types live side by side.
//! assert_eq!(updated.get::<String>("user").map(String::as_str), Some("admin"));
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// Tries are handed between threads by the snapshot store, so this is always
/// `std::sync::Arc`.
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

mod error;
mod node;
mod trie;

pub use error::LookupError;
pub use node::TrieNode;
pub use trie::PersistentTrie;

static_assertions::assert_impl_all!(PersistentTrie: Send, Sync, Clone, Default);
static_assertions::assert_impl_all!(TrieNode: Send, Sync);

// =============================================================================
// Tests
// =============================================================================
