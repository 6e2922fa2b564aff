//! A B-tree of keys with a configurable minimum degree.
//!
//! Every node holds between `t - 1` and `2t - 1` keys (the root may hold fewer) and an
//! internal node with `n` keys has `n + 1` children. Insertion is top-down: a full node is
//! split before the search ever descends into it, so a split never has to propagate back up.
//!
//! # Examples
//!
//! ```
//! use search_trees::btree::MultiwayTree;
//!
//! let mut tree = MultiwayTree::new(3)?;
//! for k in [8, 9, 10, 11, 15, 20, 17] {
//!     tree.insert(k);
//! }
//!
//! assert!(tree.contains(&20));
//! assert!(!tree.contains(&99));
//! assert_eq!(tree.min()?, &8);
//! assert_eq!(tree.successor(&11), Some(&15));
//! assert_eq!(tree.to_string(), "[ 10 ]\n[ 8 9 ] [ 11 15 17 20 ]\n");
//!
//! // A degree below 2 is rejected.
//! assert!(MultiwayTree::<i32>::new(1).is_err());
//! # Ok::<(), search_trees::Error>(())
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::error::{Error, Result};

/// The minimum degree `t` of a [`MultiwayTree`]. Always at least 2.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Degree(usize);

impl Degree {
    /// The smallest legal degree, giving a 2-3-4 tree.
    pub const DEFAULT: Degree = Degree(2);

    /// Validates `t`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `t < 2`, or if `2t` does not fit in a `usize`.
    pub fn new(t: usize) -> Result<Self> {
        if t < 2 {
            return Err(Error::invalid_argument(format!(
                "B-tree degree must be at least 2, got {}",
                t
            )));
        }
        if t.checked_mul(2).is_none() {
            return Err(Error::invalid_argument(format!(
                "B-tree degree {} is too large",
                t
            )));
        }
        Ok(Degree(t))
    }

    /// The raw degree.
    pub fn get(self) -> usize {
        self.0
    }

    /// Most keys a node may hold, `2t - 1`.
    pub fn max_keys(self) -> usize {
        2 * self.0 - 1
    }

    /// Fewest keys a non-root node may hold, `t - 1`.
    pub fn min_keys(self) -> usize {
        self.0 - 1
    }
}

impl Default for Degree {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<usize> for Degree {
    type Error = Error;

    fn try_from(t: usize) -> Result<Self> {
        Self::new(t)
    }
}

impl FromStr for Degree {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let t = s
            .trim()
            .parse::<usize>()
            .map_err(|e| Error::invalid_argument(format!("B-tree degree {:?}: {}", s, e)))?;
        Self::new(t)
    }
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Largest key count a new node reserves space for.
const PREALLOCATED_KEYS: usize = 63;

#[derive(Clone, Debug)]
struct MultiwayNode<K> {
    keys: Vec<K>,
    children: Vec<MultiwayNode<K>>,
    leaf: bool,
}

impl<K> MultiwayNode<K> {
    /// Allocates room for a full node up front when the degree is small; a node never
    /// grows past `2t - 1` keys.
    fn new(degree: Degree, leaf: bool) -> Self {
        let keys = degree.max_keys().min(PREALLOCATED_KEYS);
        Self {
            keys: Vec::with_capacity(keys),
            children: if leaf {
                Vec::new()
            } else {
                Vec::with_capacity(keys + 1)
            },
            leaf,
        }
    }

    fn is_full(&self, degree: Degree) -> bool {
        self.keys.len() == degree.max_keys()
    }

    fn min(&self) -> Option<&K> {
        let mut node = self;
        while !node.leaf {
            node = node.children.first()?;
        }
        node.keys.first()
    }

    fn max(&self) -> Option<&K> {
        let mut node = self;
        while !node.leaf {
            node = node.children.last()?;
        }
        node.keys.last()
    }
}

impl<K: Ord> MultiwayNode<K> {
    /// Index of the first key that is not less than `key`. A linear scan, as a node holds
    /// at most `2t - 1` keys.
    fn lower_bound(&self, key: &K) -> usize {
        self.keys.iter().take_while(|k| *k < key).count()
    }

    /// Moves the upper half of the full child at `index` into a new sibling and lifts the
    /// child's median key into `self` at `index`. Both halves end up with `t - 1` keys.
    fn split_child(&mut self, index: usize, degree: Degree) {
        let t = degree.get();
        let child = &mut self.children[index];
        debug_assert!(child.is_full(degree));

        let mut sibling = MultiwayNode::new(degree, child.leaf);
        sibling.keys.extend(child.keys.drain(t..));
        if !child.leaf {
            sibling.children.extend(child.children.drain(t..));
        }
        let median = child
            .keys
            .pop()
            .expect("A full node has a median key");

        trace!(index, "split child");
        self.keys.insert(index, median);
        self.children.insert(index + 1, sibling);
    }

    /// Inserts `key` below a node that is known not to be full.
    fn insert_nonfull(&mut self, key: K, degree: Degree) {
        let mut i = self.lower_bound(&key);
        if self.leaf {
            self.keys.insert(i, key);
            return;
        }

        if self.children[i].is_full(degree) {
            self.split_child(i, degree);
            if key > self.keys[i] {
                i += 1;
            }
        }
        self.children[i].insert_nonfull(key, degree);
    }
}

/// A B-tree holding distinct keys of type `K`.
#[derive(Clone, Debug)]
pub struct MultiwayTree<K> {
    root: MultiwayNode<K>,
    degree: Degree,
    len: usize,
}

impl<K> Default for MultiwayTree<K> {
    fn default() -> Self {
        Self::with_degree(Degree::DEFAULT)
    }
}

impl<K> MultiwayTree<K> {
    /// Creates an empty tree with minimum degree `t`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `t < 2`.
    pub fn new(t: usize) -> Result<Self> {
        Degree::new(t).map(Self::with_degree)
    }

    /// Creates an empty tree with an already validated degree.
    pub fn with_degree(degree: Degree) -> Self {
        Self {
            root: MultiwayNode::new(degree, true),
            degree,
            len: 0,
        }
    }

    /// The minimum degree the tree was built with.
    pub fn degree(&self) -> Degree {
        self.degree
    }

    /// Number of keys in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Edges from the root down to the leaves, which all sit at the same depth. A tree whose
    /// root is a leaf (including an empty tree) has height 0.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut node = &self.root;
        while let Some(child) = node.children.first() {
            node = child;
            height += 1;
        }
        height
    }

    /// The smallest key.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if the tree is empty.
    pub fn min(&self) -> Result<&K> {
        self.root
            .min()
            .ok_or(Error::NotFound("min of an empty B-tree"))
    }

    /// The largest key.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if the tree is empty.
    pub fn max(&self) -> Result<&K> {
        self.root
            .max()
            .ok_or(Error::NotFound("max of an empty B-tree"))
    }

    /// All keys in increasing order.
    pub fn keys(&self) -> Vec<&K> {
        fn walk<'a, K>(node: &'a MultiwayNode<K>, out: &mut Vec<&'a K>) {
            for (i, key) in node.keys.iter().enumerate() {
                if let Some(child) = node.children.get(i) {
                    walk(child, out);
                }
                out.push(key);
            }
            if let Some(child) = node.children.get(node.keys.len()) {
                walk(child, out);
            }
        }

        let mut out = Vec::with_capacity(self.len);
        walk(&self.root, &mut out);
        out
    }

    /// The keys of every node, grouped by depth, root first. Breadth-first over
    /// `(node, depth)` pairs.
    pub fn levels(&self) -> Vec<Vec<Vec<&K>>> {
        let mut levels: Vec<Vec<Vec<&K>>> = Vec::new();
        let mut queue = VecDeque::from([(&self.root, 0)]);

        while let Some((node, depth)) = queue.pop_front() {
            if levels.len() == depth {
                levels.push(Vec::new());
            }
            levels[depth].push(node.keys.iter().collect());
            queue.extend(node.children.iter().map(|child| (child, depth + 1)));
        }

        levels
    }

    /// Whether the fill bounds, key ordering and equal leaf depth all hold.
    pub fn is_valid(&self) -> bool
    where
        K: Ord,
    {
        fn check<K: Ord>(
            node: &MultiwayNode<K>,
            degree: Degree,
            is_root: bool,
            low: Option<&K>,
            high: Option<&K>,
            depth: usize,
            leaf_depth: &mut Option<usize>,
        ) -> bool {
            let n = node.keys.len();
            if n > degree.max_keys() || (!is_root && n < degree.min_keys()) {
                return false;
            }
            if node.keys.windows(2).any(|w| w[0] >= w[1]) {
                return false;
            }
            if low.map_or(false, |low| node.keys.first().map_or(false, |k| k <= low))
                || high.map_or(false, |high| node.keys.last().map_or(false, |k| k >= high))
            {
                return false;
            }

            if node.leaf {
                return node.children.is_empty() && *leaf_depth.get_or_insert(depth) == depth;
            }
            if node.children.len() != n + 1 {
                return false;
            }
            node.children.iter().enumerate().all(|(i, child)| {
                let low = if i == 0 { low } else { node.keys.get(i - 1) };
                let high = if i == n { high } else { node.keys.get(i) };
                check(child, degree, false, low, high, depth + 1, leaf_depth)
            })
        }

        check(&self.root, self.degree, true, None, None, 0, &mut None)
    }
}

impl<K: Ord> MultiwayTree<K> {
    /// Inserts `key`. Returns `false` (leaving the tree untouched) if it is already present.
    ///
    /// A full root is split first, which is the only way the tree grows taller.
    pub fn insert(&mut self, key: K) -> bool {
        if self.contains(&key) {
            return false;
        }

        if self.root.is_full(self.degree) {
            let old_root = std::mem::replace(&mut self.root, MultiwayNode::new(self.degree, false));
            self.root.children.push(old_root);
            self.root.split_child(0, self.degree);
            debug!(height = self.height(), "split full root");
        }
        self.root.insert_nonfull(key, self.degree);
        self.len += 1;
        true
    }

    /// Whether `key` is in the tree.
    pub fn contains(&self, key: &K) -> bool {
        self.level(key).is_some()
    }

    /// Depth of the node holding `key`, 0 being the root.
    pub fn level(&self, key: &K) -> Option<usize> {
        let mut node = &self.root;
        let mut level = 0;
        loop {
            let i = node.lower_bound(key);
            if node.keys.get(i) == Some(key) {
                return Some(level);
            }
            if node.leaf {
                return None;
            }
            node = &node.children[i];
            level += 1;
        }
    }

    /// The smallest key strictly greater than `key`, whether or not `key` is present.
    ///
    /// Remembers the best candidate seen on the way down. When `key` itself sits in an
    /// internal node the answer is the minimum of the child to its right.
    pub fn successor(&self, key: &K) -> Option<&K> {
        let mut best = None;
        let mut node = &self.root;
        loop {
            let i = node.keys.iter().take_while(|k| *k <= key).count();
            if let Some(candidate) = node.keys.get(i) {
                best = Some(candidate);
            }
            if node.leaf {
                return best;
            }
            if i > 0 && node.keys[i - 1] == *key {
                return node.children[i].min();
            }
            node = &node.children[i];
        }
    }

    /// The largest key strictly smaller than `key`. See [`MultiwayTree::successor`].
    pub fn predecessor(&self, key: &K) -> Option<&K> {
        let mut best = None;
        let mut node = &self.root;
        loop {
            let i = node.lower_bound(key);
            if i > 0 {
                best = Some(&node.keys[i - 1]);
            }
            if node.leaf {
                return best;
            }
            if node.keys.get(i) == Some(key) {
                return node.children[i].max();
            }
            node = &node.children[i];
        }
    }
}

impl<K: Ord> Extend<K> for MultiwayTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

/// One line per level, each node's keys bracketed: `[ 10 ]\n[ 8 9 ] [ 11 15 ]\n`.
impl<K: fmt::Display> fmt::Display for MultiwayTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for level in self.levels() {
            for (i, node) in level.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                f.write_str("[")?;
                for key in node {
                    write!(f, " {}", key)?;
                }
                f.write_str(" ]")?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}
