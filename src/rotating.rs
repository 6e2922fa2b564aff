//! A binary search tree that never rebalances itself.
//!
//! Instead each node counts the nodes in its subtree and the caller restructures the tree
//! by rotating around named keys. The counts stay correct through every insertion,
//! deletion and rotation.
//!
//! # Examples
//!
//! ```
//! use search_trees::rotating::RotatingOrderedSet;
//!
//! let mut tree = RotatingOrderedSet::new();
//! for k in [5, 3, 7, 2, 4, 6, 8] {
//!     tree.put(k, k * 10);
//! }
//! assert_eq!(tree.size_of(&5), 7);
//!
//! // The right child of 5 moves up into its place.
//! assert!(tree.rotate_left(&5));
//! assert_eq!(tree.root().map(|n| *n.key()), Some(7));
//! assert_eq!(tree.size_of(&5), 5);
//! assert_eq!(tree.size_of(&7), 7);
//! ```

use std::cmp::Ordering;
use std::fmt;

use tracing::trace;

use crate::error::{Error, Result};
use crate::iter::{Iter, Keys, Values};
use crate::metric::KeyMetric;
use crate::node::{self, Link, Node, Rotation, Size};

/// A node of a [`RotatingOrderedSet`].
pub type SizedNode<K, V> = Node<K, V, Size>;

/// An ordered map from `K` to `V` with explicit rotations and subtree sizes.
#[derive(Clone)]
pub struct RotatingOrderedSet<K, V> {
    root: Link<K, V, Size>,
}

impl<K, V> Default for RotatingOrderedSet<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Drop for RotatingOrderedSet<K, V> {
    fn drop(&mut self) {
        node::dismantle(&mut self.root);
    }
}

impl<K, V> fmt::Debug for RotatingOrderedSet<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> RotatingOrderedSet<K, V> {
    /// Generate a new, empty tree.
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Number of entries, read off the root's subtree size.
    pub fn size(&self) -> usize {
        node::size(self.root())
    }

    /// Whether the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The root node, for inspecting the shape of the tree.
    pub fn root(&self) -> Option<&SizedNode<K, V>> {
        self.root.as_deref()
    }

    /// Edges on the longest root-to-leaf path, or -1 for an empty tree. Computed by walking
    /// the whole tree since only sizes are stored.
    pub fn height(&self) -> isize {
        subtree_height(self.root())
    }

    /// The smallest key.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if the tree is empty.
    pub fn min(&self) -> Result<&K> {
        fn leftmost<K, V>(node: &SizedNode<K, V>) -> &K {
            match node.left() {
                Some(left) => leftmost(left),
                None => &node.key,
            }
        }

        self.root()
            .map(leftmost)
            .ok_or(Error::NotFound("min of an empty tree"))
    }

    /// Same as [`RotatingOrderedSet::min`] but walks down the left spine in a loop.
    pub fn min_iterative(&self) -> Result<&K> {
        let mut node = self
            .root()
            .ok_or(Error::NotFound("min of an empty tree"))?;
        while let Some(left) = node.left() {
            node = left;
        }
        Ok(&node.key)
    }

    /// The largest key.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if the tree is empty.
    pub fn max(&self) -> Result<&K> {
        self.root()
            .map(|root| &root.max().key)
            .ok_or(Error::NotFound("max of an empty tree"))
    }

    /// Iterates over the entries in key order.
    pub fn iter(&self) -> Iter<'_, K, V, Size> {
        Iter::new(self.root(), self.size())
    }

    /// Iterates over the keys in increasing order.
    pub fn keys(&self) -> Keys<'_, K, V, Size> {
        Keys(self.iter())
    }

    /// Iterates over the values in key order.
    pub fn values(&self) -> Values<'_, K, V, Size> {
        Values(self.iter())
    }

    /// Keys in order: left subtree, node, right subtree.
    pub fn inorder(&self) -> Vec<&K> {
        self.keys().collect()
    }

    /// Keys in pre-order: node, left subtree, right subtree.
    pub fn preorder(&self) -> Vec<&K> {
        fn walk<'a, K, V>(node: Option<&'a SizedNode<K, V>>, out: &mut Vec<&'a K>) {
            if let Some(node) = node {
                out.push(&node.key);
                walk(node.left(), out);
                walk(node.right(), out);
            }
        }

        let mut out = Vec::with_capacity(self.size());
        walk(self.root(), &mut out);
        out
    }

    /// Keys in post-order: left subtree, right subtree, node.
    pub fn postorder(&self) -> Vec<&K> {
        fn walk<'a, K, V>(node: Option<&'a SizedNode<K, V>>, out: &mut Vec<&'a K>) {
            if let Some(node) = node {
                walk(node.left(), out);
                walk(node.right(), out);
                out.push(&node.key);
            }
        }

        let mut out = Vec::with_capacity(self.size());
        walk(self.root(), &mut out);
        out
    }

    /// Keys grouped by depth, root first.
    pub fn levels(&self) -> Vec<Vec<&K>> {
        node::levels(self.root())
    }

    /// Whether, at every node, the sizes of the two subtrees differ by at most one.
    ///
    /// This is a statement about node counts, not heights: a tree can be height balanced
    /// without passing this check.
    pub fn is_perfectly_balanced(&self) -> bool {
        fn check<K, V>(node: Option<&SizedNode<K, V>>) -> bool {
            let Some(node) = node else {
                return true;
            };
            node::size(node.left()).abs_diff(node::size(node.right())) <= 1
                && check(node.left())
                && check(node.right())
        }

        check(self.root())
    }

    /// Whether every stored subtree size equals one plus the sizes of the children.
    pub fn sizes_consistent(&self) -> bool {
        node::metadata_consistent(self.root())
    }

    /// Rewrites every value in place, visiting nodes in pre-order.
    ///
    /// Handy for scrambling values in tests, e.g. with a random number generator.
    pub fn map_values(&mut self, mut f: impl FnMut(&K, &mut V)) {
        fn walk<K, V>(node: Option<&mut SizedNode<K, V>>, f: &mut impl FnMut(&K, &mut V)) {
            if let Some(node) = node {
                f(&node.key, &mut node.value);
                walk(node.left.as_deref_mut(), f);
                walk(node.right.as_deref_mut(), f);
            }
        }

        walk(self.root.as_deref_mut(), &mut f);
    }
}

impl<K: Ord, V> RotatingOrderedSet<K, V> {
    /// Builds a tree of minimal height from entries sorted by strictly increasing key. The
    /// middle entry of every range becomes the root of that range.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if the keys are not strictly increasing.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::rotating::RotatingOrderedSet;
    ///
    /// let tree = RotatingOrderedSet::from_sorted((1..=7).map(|k| (k, ()))).unwrap();
    /// assert_eq!(tree.height(), 2);
    /// assert!(tree.is_perfectly_balanced());
    /// ```
    pub fn from_sorted<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        fn build<K, V>(items: &mut impl Iterator<Item = (K, V)>, n: usize) -> Link<K, V, Size> {
            if n == 0 {
                return None;
            }
            let left_len = (n - 1) / 2;
            let left = build(items, left_len);
            let (key, value) = items.next()?;
            let right = build(items, n - 1 - left_len);

            let mut node = Node::boxed(key, value);
            node.left = left;
            node.right = right;
            node.update();
            Some(node)
        }

        let entries: Vec<(K, V)> = entries.into_iter().collect();
        if entries.windows(2).any(|w| w[0].0 >= w[1].0) {
            return Err(Error::invalid_argument(
                "keys must be sorted in strictly increasing order",
            ));
        }

        let len = entries.len();
        Ok(Self {
            root: build(&mut entries.into_iter(), len),
        })
    }

    /// Rebuilds the tree whose post-order traversal is `keys`, giving every key a clone of
    /// `value`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `keys` is not the post-order traversal of any binary
    /// search tree (see [`is_postorder`]).
    pub fn from_postorder(keys: Vec<K>, value: V) -> Result<Self>
    where
        V: Clone,
    {
        fn build<K: Ord, V: Clone>(mut keys: Vec<K>, value: &V) -> Link<K, V, Size> {
            let key = keys.pop()?;
            let split = keys.iter().take_while(|k| **k < key).count();
            let right = keys.split_off(split);

            let mut node = Node::boxed(key, value.clone());
            node.left = build(keys, value);
            node.right = build(right, value);
            node.update();
            Some(node)
        }

        if !is_postorder(&keys) {
            return Err(Error::invalid_argument(
                "keys are not the post-order traversal of a binary search tree",
            ));
        }
        Ok(Self {
            root: build(keys, &value),
        })
    }

    /// Inserts the given value into the tree stored at the given key, recursively. Putting
    /// a new value for an existing key overwrites its value and returns the old one.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let (root, old) = node::insert(self.root.take(), key, value, Node::updated);
        self.root = Some(root);
        old
    }

    /// Same effect as [`RotatingOrderedSet::put`] without recursion.
    ///
    /// An existing key is overwritten in place. Otherwise the insertion path is known in
    /// advance, so each node on it counts the new node on the way down.
    pub fn insert_iterative(&mut self, key: K, value: V) -> Option<V> {
        if let Some(node) = node::find_mut(&mut self.root, &key) {
            return Some(std::mem::replace(&mut node.value, value));
        }

        let mut link = &mut self.root;
        while let Some(node) = link {
            node.grow();
            link = if key < node.key {
                &mut node.left
            } else {
                &mut node.right
            };
        }
        *link = Some(Node::boxed(key, value));
        None
    }

    /// Potentially finds the value associated with the given key. If no node has the
    /// corresponding key, `None` is returned.
    pub fn get(&self, key: &K) -> Option<&V> {
        fn search<'a, K: Ord, V>(node: Option<&'a SizedNode<K, V>>, key: &K) -> Option<&'a V> {
            let node = node?;
            match key.cmp(&node.key) {
                Ordering::Less => search(node.left(), key),
                Ordering::Equal => Some(&node.value),
                Ordering::Greater => search(node.right(), key),
            }
        }

        search(self.root(), key)
    }

    /// Same as [`RotatingOrderedSet::get`] but descends in a loop.
    pub fn search_iterative(&self, key: &K) -> Option<&V> {
        node::find(self.root(), key).map(|n| &n.value)
    }

    /// Whether the tree holds `key`.
    pub fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Deletes the node containing the given key and returns its value. A node with two
    /// children takes over its in-order successor's entry.
    pub fn delete(&mut self, key: &K) -> Option<V> {
        let (root, removed) = node::remove(self.root.take(), key, Node::updated);
        self.root = root;
        removed
    }

    /// Rotates the subtree rooted at `key` to the left, lifting its right child into its
    /// place.
    ///
    /// Returns `false` (and changes nothing) if `key` is absent or has no right child.
    pub fn rotate_left(&mut self, key: &K) -> bool {
        let rotated = node::rotate_at(&mut self.root, key, Rotation::Left);
        trace!(rotated, "rotate left");
        rotated
    }

    /// Rotates the subtree rooted at `key` to the right, lifting its left child into its
    /// place.
    ///
    /// Returns `false` (and changes nothing) if `key` is absent or has no left child.
    pub fn rotate_right(&mut self, key: &K) -> bool {
        let rotated = node::rotate_at(&mut self.root, key, Rotation::Right);
        trace!(rotated, "rotate right");
        rotated
    }

    /// Number of nodes in the subtree rooted at `key`, or 0 if `key` is absent.
    pub fn size_of(&self, key: &K) -> usize {
        node::size(node::find(self.root(), key))
    }

    /// Height of the subtree rooted at `key`.
    pub fn height_of(&self, key: &K) -> Option<isize> {
        node::find(self.root(), key).map(|n| subtree_height(Some(n)))
    }

    /// Edges between the root and the node holding `key`.
    pub fn depth(&self, key: &K) -> Option<usize> {
        node::depth(self.root(), key)
    }

    /// Whether the keys are in binary search tree order.
    pub fn is_bst(&self) -> bool {
        node::is_bst(self.root())
    }

    /// The smallest key strictly greater than `key`.
    pub fn successor(&self, key: &K) -> Option<&K> {
        node::successor(self.root(), key)
    }

    /// The largest key strictly smaller than `key`.
    pub fn predecessor(&self, key: &K) -> Option<&K> {
        node::predecessor(self.root(), key)
    }

    /// The keys on the path between `from` and `to`, both ends included, going up from
    /// `from` to their lowest common ancestor and back down to `to`.
    ///
    /// Returns `None` unless both keys are in the tree.
    pub fn path_between(&self, from: &K, to: &K) -> Option<Vec<&K>> {
        if !self.contains(from) || !self.contains(to) {
            return None;
        }

        let mut ancestor = self.root()?;
        loop {
            let next = match (from.cmp(&ancestor.key), to.cmp(&ancestor.key)) {
                (Ordering::Less, Ordering::Less) => ancestor.left(),
                (Ordering::Greater, Ordering::Greater) => ancestor.right(),
                _ => break,
            };
            ancestor = next?;
        }

        let mut path = path_down(ancestor, from);
        path.reverse();
        path.extend(path_down(ancestor, to).into_iter().skip(1));
        Some(path)
    }
}

impl<K: Ord + KeyMetric, V> RotatingOrderedSet<K, V> {
    /// The key nearest to `key` by [`KeyMetric::distance`], or `None` for an empty tree.
    ///
    /// Only the search path for `key` is examined. Between two keys at the same distance the
    /// one met first (closer to the root) wins. For text keys the distance is a proxy, so the
    /// answer is approximate.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::rotating::RotatingOrderedSet;
    ///
    /// let mut tree = RotatingOrderedSet::new();
    /// for k in [10, 5, 20, 17] {
    ///     tree.put(k, ());
    /// }
    /// assert_eq!(tree.search_closest(&16), Some(&17));
    /// assert_eq!(tree.search_closest(&6), Some(&5));
    /// ```
    pub fn search_closest(&self, key: &K) -> Option<&K> {
        let mut closest: Option<(&K, f64)> = None;
        let mut node = self.root();

        while let Some(n) = node {
            let distance = key.distance(&n.key);
            if closest.map_or(true, |(_, best)| distance < best) {
                closest = Some((&n.key, distance));
            }
            node = match key.cmp(&n.key) {
                Ordering::Less => n.left(),
                Ordering::Equal => return Some(&n.key),
                Ordering::Greater => n.right(),
            };
        }

        closest.map(|(k, _)| k)
    }

    /// Whether two distinct keys add up to `sum`, by a two-pointer scan over the sorted keys.
    ///
    /// Gives up and returns `false` as soon as it meets a key without an integer value.
    pub fn check_exist_two_nodes_with_sum(&self, sum: i64) -> bool {
        let keys = self.inorder();
        if keys.len() < 2 {
            return false;
        }

        let (mut i, mut j) = (0, keys.len() - 1);
        while i < j {
            let (Some(low), Some(high)) = (keys[i].as_integer(), keys[j].as_integer()) else {
                return false;
            };
            match (i128::from(low) + i128::from(high)).cmp(&i128::from(sum)) {
                Ordering::Equal => return true,
                Ordering::Less => i += 1,
                Ordering::Greater => j -= 1,
            }
        }
        false
    }

    /// Every downward path (from a node to one of its descendants, or a single node) whose
    /// integer keys add up to `sum`. Keys without an integer value are skipped over.
    ///
    /// Paths are listed top-down, grouped by their lowest node in pre-order.
    pub fn paths_with_sum(&self, sum: i64) -> Vec<Vec<&K>> {
        fn walk<'a, K: KeyMetric, V>(
            node: Option<&'a SizedNode<K, V>>,
            sum: i128,
            path: &mut Vec<&'a K>,
            out: &mut Vec<Vec<&'a K>>,
        ) {
            let Some(node) = node else {
                return;
            };
            path.push(&node.key);

            let mut running = 0i128;
            for start in (0..path.len()).rev() {
                let Some(value) = path[start].as_integer() else {
                    continue;
                };
                running += i128::from(value);
                if running == sum {
                    out.push(path[start..].to_vec());
                }
            }

            walk(node.left(), sum, path, out);
            walk(node.right(), sum, path, out);
            path.pop();
        }

        let mut out = Vec::new();
        walk(self.root(), i128::from(sum), &mut Vec::new(), &mut out);
        out
    }
}

/// Whether `keys` is the post-order traversal of some binary search tree with distinct keys.
///
/// # Examples
///
/// ```
/// use search_trees::rotating::is_postorder;
///
/// assert!(is_postorder(&[1, 3, 2, 5, 7, 6, 4]));
/// assert!(!is_postorder(&[1, 7, 2, 5, 3, 6, 4]));
/// ```
pub fn is_postorder<K: Ord>(keys: &[K]) -> bool {
    let Some((root, rest)) = keys.split_last() else {
        return true;
    };
    let split = rest.iter().take_while(|k| *k < root).count();
    let (left, right) = rest.split_at(split);

    right.iter().all(|k| k > root) && is_postorder(left) && is_postorder(right)
}

fn subtree_height<K, V>(node: Option<&SizedNode<K, V>>) -> isize {
    node.map_or(-1, |n| 1 + subtree_height(n.left()).max(subtree_height(n.right())))
}

/// Keys from `node` down to `key`, which must be below `node`.
fn path_down<'a, K: Ord, V>(node: &'a SizedNode<K, V>, key: &K) -> Vec<&'a K> {
    let mut path = Vec::new();
    let mut next = Some(node);
    while let Some(n) = next {
        path.push(&n.key);
        next = match key.cmp(&n.key) {
            Ordering::Less => n.left(),
            Ordering::Equal => None,
            Ordering::Greater => n.right(),
        };
    }
    path
}

impl<K: Ord, V> FromIterator<(K, V)> for RotatingOrderedSet<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord, V> Extend<(K, V)> for RotatingOrderedSet<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a RotatingOrderedSet<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, Size>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}


#[cfg(test)]
mod quicktests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::test::quick::RotateOp;

    quickcheck::quickcheck! {
        fn sizes_survive_any_operations(ops: Vec<RotateOp<i8, i8>>) -> bool {
            let mut tree = RotatingOrderedSet::new();
            let mut model = BTreeMap::new();

            for op in ops {
                match op {
                    RotateOp::Put(k, v) => assert_eq!(tree.put(k, v), model.insert(k, v)),
                    RotateOp::InsertIterative(k, v) => {
                        assert_eq!(tree.insert_iterative(k, v), model.insert(k, v))
                    }
                    RotateOp::Delete(k) => assert_eq!(tree.delete(&k), model.remove(&k)),
                    RotateOp::RotateLeft(k) => {
                        tree.rotate_left(&k);
                    }
                    RotateOp::RotateRight(k) => {
                        tree.rotate_right(&k);
                    }
                }
                if !tree.sizes_consistent() || !tree.is_bst() || tree.size() != model.len() {
                    return false;
                }
            }

            tree.iter().eq(model.iter())
        }
    }

    quickcheck::quickcheck! {
        fn sum_check_matches_brute_force(xs: Vec<i8>, sum: i16) -> bool {
            let tree: RotatingOrderedSet<i8, ()> = xs.iter().map(|&x| (x, ())).collect();
            let keys = tree.inorder();
            let brute = keys.iter().enumerate().any(|(i, a)| {
                keys[i + 1..].iter().any(|b| i64::from(**a) + i64::from(**b) == i64::from(sum))
            });
            tree.check_exist_two_nodes_with_sum(i64::from(sum)) == brute
        }
    }
}
