//! Persistent (immutable) trie keyed by byte sequences.
//!
//! This module provides [`PersistentTrie`], a copy-on-write trie whose nodes
//! are shared between every version derived from the same ancestor.
//!
//! # Overview
//!
//! Every edge is labeled with a single byte of the key. A node may carry a
//! value of any `'static + Send + Sync` type; the type is recorded next to the
//! value and checked on every lookup, so one trie can hold values of several
//! types at once.
//!
//! - O(k) get, where k is the key length
//! - O(k) put: only the nodes on the root-to-key path are rebuilt
//! - O(k) remove: same path, plus pruning of nodes left without a value or
//!   children
//! - O(1) clone
//!
//! # Examples
//!
//! ```rust
//! use cowtrie::persistent::PersistentTrie;
//!
//! let trie = PersistentTrie::new()
//!     .put("cat", 1_u32)
//!     .put("car", 2_u32)
//!     .put("cart", 3_u32);
//!
//! assert_eq!(trie.get::<u32>("car"), Some(&2));
//! assert_eq!(trie.get::<u32>("ca"), None);
//!
//! // Structural sharing: the original trie is preserved
//! let removed = trie.remove("car");
//! assert_eq!(trie.get::<u32>("car"), Some(&2));   // Original unchanged
//! assert_eq!(removed.get::<u32>("car"), None);    // New version
//! assert_eq!(removed.get::<u32>("cart"), Some(&3));
//! ```

use std::any::{Any, type_name};
use std::fmt;
use std::iter::FromIterator;

use smallvec::SmallVec;

use super::ReferenceCounter;
use super::error::LookupError;
use super::node::{NodeValue, TrieNode};

/// Number of ancestors `remove` records inline before spilling to the heap.
const INLINE_PATH_DEPTH: usize = 32;

// =============================================================================
// PersistentTrie Definition
// =============================================================================

/// A persistent (immutable) trie with typed values.
///
/// `PersistentTrie` is a handle to a root node, or to nothing at all when no
/// key has been stored yet. Cloning the handle copies a single pointer.
/// [`put`](Self::put) and [`remove`](Self::remove) never touch the receiver;
/// they return a new handle that shares every subtree off the modified path.
///
/// # Time Complexity
///
/// | Operation      | Complexity |
/// |----------------|------------|
/// | `new`          | O(1)       |
/// | `clone`        | O(1)       |
/// | `get`          | O(k)       |
/// | `put`          | O(k)       |
/// | `remove`       | O(k)       |
/// | `node_count`   | O(N)       |
///
/// # Examples
///
/// ```rust
/// use cowtrie::persistent::PersistentTrie;
///
/// let trie = PersistentTrie::new().put("answer", 42_u64);
///
/// // A lookup with the wrong type reads as absent.
/// assert_eq!(trie.get::<u64>("answer"), Some(&42));
/// assert_eq!(trie.get::<String>("answer"), None);
/// ```
#[derive(Clone, Default)]
pub struct PersistentTrie {
    root: Option<ReferenceCounter<TrieNode>>,
}

impl PersistentTrie {
    /// Creates a new empty trie.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cowtrie::persistent::PersistentTrie;
    ///
    /// let trie = PersistentTrie::new();
    /// assert!(trie.is_empty());
    /// assert_eq!(trie.get::<u32>(""), None);
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { root: None }
    }

    /// Returns `true` if the trie has no root node.
    ///
    /// A trie becomes empty again once every stored key has been removed.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the root node, if any.
    #[inline]
    #[must_use]
    pub fn root(&self) -> Option<&TrieNode> {
        self.root.as_deref()
    }

    /// Returns `true` if both handles point at the same root node.
    ///
    /// Two empty tries are considered identical.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cowtrie::persistent::PersistentTrie;
    ///
    /// let trie = PersistentTrie::new().put("a", 1_u8);
    /// assert!(trie.ptr_eq(&trie.clone()));
    /// assert!(trie.ptr_eq(&trie.remove("missing")));
    /// assert!(!trie.ptr_eq(&trie.put("a", 1_u8)));
    /// ```
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (None, None) => true,
            (Some(left), Some(right)) => ReferenceCounter::ptr_eq(left, right),
            _ => false,
        }
    }

    /// Counts the nodes reachable from the root.
    ///
    /// # Complexity
    ///
    /// O(N)
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.root().map_or(0, TrieNode::subtree_size)
    }

    /// Walks one edge per key byte and returns the node the key ends on.
    fn find(&self, key: &[u8]) -> Option<&TrieNode> {
        let mut node = self.root()?;
        for label in key {
            node = node.child(*label)?;
        }
        Some(node)
    }

    /// Returns a reference to the value stored under `key` as a `T`.
    ///
    /// Returns `None` if the key is absent, if the node it ends on holds no
    /// value, or if the stored value is not a `T`.
    ///
    /// # Complexity
    ///
    /// O(k)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cowtrie::persistent::PersistentTrie;
    ///
    /// let trie = PersistentTrie::new().put("hello", String::from("world"));
    ///
    /// assert_eq!(trie.get::<String>("hello").map(String::as_str), Some("world"));
    /// assert_eq!(trie.get::<String>("hell"), None);
    /// assert_eq!(trie.get::<u32>("hello"), None);
    /// ```
    #[must_use]
    pub fn get<T: Any>(&self, key: impl AsRef<[u8]>) -> Option<&T> {
        self.find(key.as_ref())?.value()?.downcast_ref::<T>()
    }

    /// Like [`get`](Self::get), but reports why nothing was found.
    ///
    /// # Errors
    ///
    /// - [`LookupError::Missing`] if no value is stored under `key`
    /// - [`LookupError::TypeMismatch`] if the stored value is not a `T`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cowtrie::persistent::{LookupError, PersistentTrie};
    ///
    /// let trie = PersistentTrie::new().put("id", 5_u32);
    ///
    /// assert_eq!(trie.try_get::<u32>("id"), Ok(&5));
    /// assert_eq!(trie.try_get::<u32>("other"), Err(LookupError::Missing));
    /// assert!(matches!(
    ///     trie.try_get::<String>("id"),
    ///     Err(LookupError::TypeMismatch { stored: "u32", .. })
    /// ));
    /// ```
    pub fn try_get<T: Any>(&self, key: impl AsRef<[u8]>) -> Result<&T, LookupError> {
        let value = self
            .find(key.as_ref())
            .and_then(TrieNode::value)
            .ok_or(LookupError::Missing)?;

        value
            .downcast_ref::<T>()
            .ok_or_else(|| LookupError::TypeMismatch {
                requested: type_name::<T>(),
                stored: value.type_name(),
            })
    }

    /// Shares the value stored under `key` so it can outlive this handle.
    pub(crate) fn get_shared<T: Any + Send + Sync>(
        &self,
        key: impl AsRef<[u8]>,
    ) -> Option<ReferenceCounter<T>> {
        self.find(key.as_ref())?.value()?.downcast_shared::<T>()
    }

    /// Returns `true` if a value of any type is stored under `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cowtrie::persistent::PersistentTrie;
    ///
    /// let trie = PersistentTrie::new().put("ab", 1_u8);
    /// assert!(trie.contains_key("ab"));
    /// assert!(!trie.contains_key("a"));
    /// ```
    #[must_use]
    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> bool {
        self.find(key.as_ref())
            .is_some_and(TrieNode::is_value_node)
    }

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// Only the nodes on the root-to-key path are rebuilt; each of them is a
    /// shallow copy of its predecessor, so every other key keeps resolving
    /// through the very same nodes as in `self`. A node that already existed
    /// at the end of the path keeps its children. `value` is moved exactly
    /// once and need not be `Clone`.
    ///
    /// The empty key stores the value on the root itself.
    ///
    /// # Complexity
    ///
    /// O(k)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cowtrie::persistent::PersistentTrie;
    ///
    /// let trie1 = PersistentTrie::new().put("key", 1_i32);
    /// let trie2 = trie1.put("key", 2_i32);
    ///
    /// assert_eq!(trie1.get::<i32>("key"), Some(&1)); // Original unchanged
    /// assert_eq!(trie2.get::<i32>("key"), Some(&2)); // New version
    /// ```
    #[must_use]
    pub fn put<T: Any + Send + Sync>(&self, key: impl AsRef<[u8]>, value: T) -> Self {
        let key = key.as_ref();

        // existing[depth] is the node reached after `depth` bytes, if any.
        let mut existing: SmallVec<[Option<&TrieNode>; INLINE_PATH_DEPTH]> = SmallVec::new();
        let mut node = self.root();
        for label in key {
            existing.push(node);
            node = node.and_then(|current| current.child(*label));
        }

        let children = node
            .map(|terminal| terminal.edges().clone())
            .unwrap_or_default();
        let mut replacement = TrieNode::with_value(children, NodeValue::new(value));

        for (parent, label) in existing.iter().rev().zip(key.iter().rev()) {
            let mut cloned = parent.cloned().unwrap_or_default();
            cloned.attach(*label, Some(replacement));
            replacement = cloned;
        }

        Self {
            root: Some(ReferenceCounter::new(replacement)),
        }
    }

    /// Removes the value stored under `key`.
    ///
    /// If the key is absent, or the node it ends on holds no value, the
    /// returned handle points at the same root as `self`. Otherwise the
    /// path is rebuilt bottom-up: the terminal node loses its value, and every
    /// node left with neither a value nor children is dropped from its parent.
    /// Removing the last key yields an empty trie.
    ///
    /// # Complexity
    ///
    /// O(k)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cowtrie::persistent::PersistentTrie;
    ///
    /// let trie = PersistentTrie::new().put("abc", 1_u32);
    /// let removed = trie.remove("abc");
    ///
    /// assert_eq!(trie.get::<u32>("abc"), Some(&1));
    /// assert_eq!(removed.get::<u32>("abc"), None);
    /// assert!(removed.is_empty());
    /// ```
    #[must_use]
    pub fn remove(&self, key: impl AsRef<[u8]>) -> Self {
        let key = key.as_ref();
        let Some(root) = self.root() else {
            return self.clone();
        };

        let mut path: SmallVec<[&TrieNode; INLINE_PATH_DEPTH]> = SmallVec::new();
        let mut node = root;
        for label in key {
            let Some(child) = node.child(*label) else {
                return self.clone();
            };
            path.push(node);
            node = child;
        }

        if !node.is_value_node() {
            return self.clone();
        }

        let mut replacement = if node.child_count() == 0 {
            None
        } else {
            Some(TrieNode::branch(node.edges().clone()))
        };

        for (parent, label) in path.iter().rev().zip(key.iter().rev()) {
            let mut cloned = (*parent).clone();
            cloned.attach(*label, replacement);
            replacement = if cloned.is_prunable() {
                None
            } else {
                Some(cloned)
            };
        }

        Self {
            root: replacement.map(ReferenceCounter::new),
        }
    }
}

impl fmt::Debug for PersistentTrie {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("PersistentTrie")
            .field("root", &self.root())
            .finish()
    }
}

impl<K, V> FromIterator<(K, V)> for PersistentTrie
where
    K: AsRef<[u8]>,
    V: Any + Send + Sync,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |trie, (key, value)| trie.put(key, value))
    }
}

// =============================================================================
// Tests
// =============================================================================
