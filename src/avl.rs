//! A self-balancing ordered map (an AVL tree).
//!
//! Every node remembers the height of its subtree. After any insertion or removal the
//! heights along the modified path are recomputed bottom-up and any node whose children's
//! heights differ by more than one is fixed with a single or double rotation, so lookups
//! stay `O(lg N)`.
//!
//! # Examples
//!
//! ```
//! use search_trees::avl::BalancedMap;
//!
//! let mut map = BalancedMap::new();
//!
//! // Nothing in here yet.
//! assert_eq!(map.get(&1), None);
//! assert_eq!(map.first_key(), None);
//!
//! map.put(1, "one");
//! map.put(2, "two");
//! assert_eq!(map.get(&1), Some(&"one"));
//!
//! // Putting a new value for the same key overwrites the value.
//! assert_eq!(map.put(1, "uno"), Some("one"));
//! assert_eq!(map.get(&1), Some(&"uno"));
//!
//! // Removing a key returns its value.
//! assert_eq!(map.remove(&1), Some("uno"));
//! assert_eq!(map.first_key(), Some(&2));
//! ```

use std::fmt;

use tracing::trace;

use crate::iter::{self, Keys, Values};
use crate::node::{self, Height, Link, Node, Rotation};

/// A node of a [`BalancedMap`].
pub type AvlNode<K, V> = Node<K, V, Height>;

/// In-order iterator over a [`BalancedMap`].
pub type Iter<'a, K, V> = iter::Iter<'a, K, V, Height>;

/// A self-balancing Binary Search Tree (specifically, an AVL tree). This can be used for
/// inserting, finding, and removing keys and values.
#[derive(Clone)]
pub struct BalancedMap<K, V> {
    root: Link<K, V, Height>,
    len: usize,
}

impl<K, V> Default for BalancedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for BalancedMap<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> BalancedMap<K, V> {
    /// Generate a new, empty `BalancedMap`.
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Number of entries in the map.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Edges on the longest root-to-leaf path. A single entry has height 0 and an empty map
    /// has height -1.
    pub fn height(&self) -> isize {
        node::height(self.root())
    }

    /// The root node, for inspecting the shape of the tree.
    pub fn root(&self) -> Option<&AvlNode<K, V>> {
        self.root.as_deref()
    }

    /// The smallest key, or `None` if the map is empty.
    pub fn first_key(&self) -> Option<&K> {
        self.root().map(|root| &root.min().key)
    }

    /// The largest key, or `None` if the map is empty.
    pub fn last_key(&self) -> Option<&K> {
        self.root().map(|root| &root.max().key)
    }

    /// Iterates over the entries in key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.root(), self.len)
    }

    /// Iterates over the keys in increasing order.
    pub fn keys(&self) -> Keys<'_, K, V, Height> {
        Keys(self.iter())
    }

    /// Iterates over the values in key order.
    pub fn values(&self) -> Values<'_, K, V, Height> {
        Values(self.iter())
    }

    /// Keys grouped by depth, root first.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::avl::BalancedMap;
    ///
    /// let map: BalancedMap<_, _> = (1..=3).map(|k| (k, ())).collect();
    /// assert_eq!(map.levels(), vec![vec![&2], vec![&1, &3]]);
    /// ```
    pub fn levels(&self) -> Vec<Vec<&K>> {
        node::levels(self.root())
    }
}

impl<K: Ord, V> BalancedMap<K, V> {
    /// Potentially finds the value associated with the given key in this map. If no node has
    /// the corresponding key, `None` is returned.
    pub fn get(&self, key: &K) -> Option<&V> {
        node::find(self.root(), key).map(|n| &n.value)
    }

    /// Whether the map holds `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Inserts the given value into the map stored at the given key. Putting a new value for
    /// an existing key overwrites its value without restructuring the tree, and returns the
    /// old value.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let (root, old) = node::insert(self.root.take(), key, value, balance);
        self.root = Some(root);
        if old.is_none() {
            self.len += 1;
        }
        old
    }

    /// Removes the entry for `key` and returns its value. If the map does not hold `key`,
    /// nothing happens.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let (root, removed) = node::remove(self.root.take(), key, balance);
        self.root = root;
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// The smallest key strictly greater than `key`.
    pub fn successor(&self, key: &K) -> Option<&K> {
        node::successor(self.root(), key)
    }

    /// The largest key strictly smaller than `key`.
    pub fn predecessor(&self, key: &K) -> Option<&K> {
        node::predecessor(self.root(), key)
    }

    /// Rotates the subtree rooted at `key` to the left, lifting its right child into its
    /// place. Heights are kept up to date, but the result may no longer be height balanced;
    /// the next `put` or `remove` only repairs the nodes on its own path.
    ///
    /// Returns `false` (and changes nothing) if `key` is absent or has no right child.
    pub fn rotate_left(&mut self, key: &K) -> bool {
        trace!("manual left rotation");
        node::rotate_at(&mut self.root, key, Rotation::Left)
    }

    /// Rotates the subtree rooted at `key` to the right. See [`BalancedMap::rotate_left`].
    pub fn rotate_right(&mut self, key: &K) -> bool {
        trace!("manual right rotation");
        node::rotate_at(&mut self.root, key, Rotation::Right)
    }

    /// Whether every node's children differ in height by at most one and every stored height
    /// is accurate.
    pub fn is_balanced(&self) -> bool {
        fn check<K, V>(node: &AvlNode<K, V>) -> bool {
            node.balance_factor().abs() <= 1
                && node.left().map_or(true, check)
                && node.right().map_or(true, check)
        }

        node::metadata_consistent(self.root()) && self.root().map_or(true, check)
    }

    /// Whether the keys are in binary search tree order.
    pub fn is_bst(&self) -> bool {
        node::is_bst(self.root())
    }
}

/// Recomputes the height of `node` and, if its children's heights differ by more than one,
/// rotates it back into balance.
///
/// See <https://en.wikipedia.org/wiki/AVL_tree#Rebalancing> for terminology. The sign of
/// the taller child's balance factor decides between a single and a double rotation. After
/// an insertion that child is never level, so this matches the usual "which side did the key
/// go" rule; after a removal a level child takes the single rotation.
fn balance<K, V>(mut node: Box<AvlNode<K, V>>) -> Box<AvlNode<K, V>> {
    node.update();

    let balance_factor = node.balance_factor();
    if balance_factor > 1 {
        if node.left().map_or(0, AvlNode::balance_factor) < 0 {
            trace!(balance_factor, "left-right case");
            node.left = node.left.take().map(node::rotate_left);
        }
        node = node::rotate_right(node);
    } else if balance_factor < -1 {
        if node.right().map_or(0, AvlNode::balance_factor) > 0 {
            trace!(balance_factor, "right-left case");
            node.right = node.right.take().map(node::rotate_right);
        }
        node = node::rotate_left(node);
    }

    // In tests, after balancing, assert that we've restored/maintained the AVL invariant.
    if cfg!(test) {
        assert!(node.balance_factor().abs() <= 1);
    }
    node
}

impl<K: Ord, V> FromIterator<(K, V)> for BalancedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for BalancedMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a BalancedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
