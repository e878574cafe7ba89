//! Immutable trie nodes and their type-tagged values.
//!
//! A [`TrieNode`] is built once in local scope, wrapped in a
//! [`ReferenceCounter`] when it is attached under its parent, and never
//! mutated afterwards. Every snapshot that can reach a node shares it.

use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::fmt;

use super::ReferenceCounter;

// =============================================================================
// NodeValue Definition
// =============================================================================

/// A value stored in a node together with the identity of its type.
///
/// The payload sits behind a shared pointer so that shallow-cloning a node
/// never requires the value type to be `Clone`.
#[derive(Clone)]
pub(crate) struct NodeValue {
    type_tag: TypeId,
    type_name: &'static str,
    payload: ReferenceCounter<dyn Any + Send + Sync>,
}

impl NodeValue {
    /// Moves `value` into a freshly allocated payload.
    pub(crate) fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_tag: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            payload: ReferenceCounter::new(value),
        }
    }

    /// Returns `true` if the stored value has type `T`.
    #[inline]
    pub(crate) fn holds<T: Any>(&self) -> bool {
        self.type_tag == TypeId::of::<T>()
    }

    #[inline]
    pub(crate) const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Borrows the value as `T`, or `None` on a type mismatch.
    pub(crate) fn downcast_ref<T: Any>(&self) -> Option<&T> {
        if !self.holds::<T>() {
            return None;
        }
        self.payload.as_ref().downcast_ref::<T>()
    }

    /// Shares the value as `T`, or `None` on a type mismatch.
    pub(crate) fn downcast_shared<T: Any + Send + Sync>(&self) -> Option<ReferenceCounter<T>> {
        if !self.holds::<T>() {
            return None;
        }
        ReferenceCounter::clone(&self.payload).downcast::<T>().ok()
    }
}

impl fmt::Debug for NodeValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("NodeValue")
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// TrieNode Definition
// =============================================================================

/// A node of a [`PersistentTrie`](super::PersistentTrie).
///
/// Each node maps single-byte edge labels to child nodes and may carry one
/// value of an arbitrary `'static` type. Nodes are only observable through
/// shared references, so their contents never change once they are reachable
/// from a published trie.
///
/// # Examples
///
/// ```rust
/// use cowtrie::persistent::PersistentTrie;
///
/// let trie = PersistentTrie::new().put("ab", 1_u32);
/// let root = trie.root().unwrap();
///
/// assert!(!root.is_value_node());
/// let a = root.child(b'a').unwrap();
/// assert!(a.child(b'b').unwrap().is_value_node());
/// ```
#[derive(Clone, Default)]
pub struct TrieNode {
    children: BTreeMap<u8, ReferenceCounter<TrieNode>>,
    value: Option<NodeValue>,
}

impl TrieNode {
    /// Creates a node carrying `value` over the given children.
    pub(crate) fn with_value(
        children: BTreeMap<u8, ReferenceCounter<Self>>,
        value: NodeValue,
    ) -> Self {
        Self {
            children,
            value: Some(value),
        }
    }

    /// Creates a valueless node over the given children.
    pub(crate) fn branch(children: BTreeMap<u8, ReferenceCounter<Self>>) -> Self {
        Self {
            children,
            value: None,
        }
    }

    /// Returns the child reached through `label`, if any.
    #[inline]
    #[must_use]
    pub fn child(&self, label: u8) -> Option<&Self> {
        self.children.get(&label).map(|child| &**child)
    }

    /// Returns the shared pointer to the child reached through `label`.
    ///
    /// Two tries that share a subtree return pointers that compare equal with
    /// [`std::sync::Arc::ptr_eq`].
    #[inline]
    #[must_use]
    pub fn shared_child(&self, label: u8) -> Option<&ReferenceCounter<Self>> {
        self.children.get(&label)
    }

    /// Iterates over the edges of this node in label order.
    pub fn children(&self) -> impl Iterator<Item = (u8, &Self)> + '_ {
        self.children
            .iter()
            .map(|(label, child)| (*label, &**child))
    }

    /// Returns the number of outgoing edges.
    #[inline]
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if this node carries a value.
    #[inline]
    #[must_use]
    pub const fn is_value_node(&self) -> bool {
        self.value.is_some()
    }

    /// Returns the name of the stored value's type, if any.
    #[must_use]
    pub fn value_type_name(&self) -> Option<&'static str> {
        self.value.as_ref().map(NodeValue::type_name)
    }

    #[inline]
    pub(crate) const fn value(&self) -> Option<&NodeValue> {
        self.value.as_ref()
    }

    #[inline]
    pub(crate) const fn edges(&self) -> &BTreeMap<u8, ReferenceCounter<Self>> {
        &self.children
    }

    /// Attaches `child` under `label`, or detaches the edge when `child` is
    /// `None`.
    pub(crate) fn attach(&mut self, label: u8, child: Option<Self>) {
        match child {
            Some(child) => {
                self.children.insert(label, ReferenceCounter::new(child));
            }
            None => {
                self.children.remove(&label);
            }
        }
    }

    /// A node with neither a value nor children is dead and must not stay
    /// reachable.
    #[inline]
    pub(crate) fn is_prunable(&self) -> bool {
        self.value.is_none() && self.children.is_empty()
    }

    /// Counts this node and every node reachable from it.
    pub(crate) fn subtree_size(&self) -> usize {
        let mut pending: Vec<&Self> = vec![self];
        let mut count = 0;
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.children.values().map(|child| &**child));
        }
        count
    }
}

/// Frees uniquely owned descendants with an explicit work stack, so dropping a
/// long chain does not recurse once per level. Subtrees still shared with
/// another version are only released, never walked.
impl Drop for TrieNode {
    fn drop(&mut self) {
        let mut pending: Vec<ReferenceCounter<Self>> =
            std::mem::take(&mut self.children).into_values().collect();
        while let Some(child) = pending.pop() {
            if let Ok(mut owned) = ReferenceCounter::try_unwrap(child) {
                pending.extend(std::mem::take(&mut owned.children).into_values());
            }
        }
    }
}

impl fmt::Debug for TrieNode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<char> = self.children.keys().map(|label| char::from(*label)).collect();
        formatter
            .debug_struct("TrieNode")
            .field("edges", &labels)
            .field("value", &self.value_type_name())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
