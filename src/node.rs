//! The binary node shared by [`BalancedMap`][crate::avl::BalancedMap] and
//! [`RotatingOrderedSet`][crate::rotating::RotatingOrderedSet].
//!
//! A [`Node`] owns its children exclusively (there are no parent pointers) and carries a
//! piece of [`Metadata`] describing its subtree. The AVL map stores a [`Height`], the
//! rotating tree a [`Size`]. Every structural change goes through the functions in this
//! module, which take a subtree by value and hand back the rebuilt subtree, recomputing the
//! metadata of every node on the way back up.

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt;

pub(crate) type Link<K, V, M> = Option<Box<Node<K, V, M>>>;

/// Applied to every node on the path from a mutated node back up to the root.
pub(crate) type Fixup<K, V, M> = fn(Box<Node<K, V, M>>) -> Box<Node<K, V, M>>;

/// Bookkeeping a [`Node`] keeps about the subtree rooted at it.
pub trait Metadata: Copy + fmt::Debug {
    /// The value for a node without children.
    const LEAF: Self;

    /// Computes the value for a node from the values of its (possibly missing) children.
    fn recompute(left: Option<Self>, right: Option<Self>) -> Self;
}

/// How many edges are on the longest path from a node down to a leaf. A node without
/// children has a height of 0, so an empty subtree counts as -1.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Height(isize);

impl Height {
    /// The height of an empty subtree.
    pub const EMPTY: isize = -1;

    /// The raw height.
    pub fn get(self) -> isize {
        self.0
    }
}

impl Metadata for Height {
    const LEAF: Self = Height(0);

    fn recompute(left: Option<Self>, right: Option<Self>) -> Self {
        let left = left.map_or(Self::EMPTY, Height::get);
        let right = right.map_or(Self::EMPTY, Height::get);
        Height(1 + left.max(right))
    }
}

/// How many nodes are in the subtree rooted at a node, including itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Size(usize);

impl Size {
    /// The raw size.
    pub fn get(self) -> usize {
        self.0
    }
}

impl Metadata for Size {
    const LEAF: Self = Size(1);

    fn recompute(left: Option<Self>, right: Option<Self>) -> Self {
        Size(1 + left.map_or(0, Size::get) + right.map_or(0, Size::get))
    }
}

/// A `Node` has a key that is used for searching/sorting and a value that is associated
/// with that key. It has up to two children and the [`Metadata`] of its subtree.
#[derive(Clone, Debug)]
pub struct Node<K, V, M> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Link<K, V, M>,
    pub(crate) right: Link<K, V, M>,
    pub(crate) meta: M,
}

impl<K, V, M: Metadata> Node<K, V, M> {
    pub(crate) fn boxed(key: K, value: V) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            left: None,
            right: None,
            meta: M::LEAF,
        })
    }

    /// Recomputes this node's metadata from its children.
    pub(crate) fn update(&mut self) {
        self.meta = M::recompute(
            self.left.as_ref().map(|n| n.meta),
            self.right.as_ref().map(|n| n.meta),
        );
    }

    /// [`Fixup`] that only recomputes metadata.
    pub(crate) fn updated(mut self: Box<Self>) -> Box<Self> {
        self.update();
        self
    }
}

impl<K, V, M> Node<K, V, M> {
    /// The key stored at this node.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The value stored at this node.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// The left child, whose keys are all smaller than this node's key.
    pub fn left(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    /// The right child, whose keys are all larger than this node's key.
    pub fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }

    /// The metadata of the subtree rooted here.
    pub fn metadata(&self) -> M
    where
        M: Copy,
    {
        self.meta
    }

    pub(crate) fn min(&self) -> &Self {
        let mut node = self;
        while let Some(left) = node.left() {
            node = left;
        }
        node
    }

    pub(crate) fn max(&self) -> &Self {
        let mut node = self;
        while let Some(right) = node.right() {
            node = right;
        }
        node
    }
}

impl<K, V> Node<K, V, Height> {
    /// Edges on the longest path from this node down to a leaf.
    pub fn height(&self) -> isize {
        self.meta.get()
    }

    pub(crate) fn balance_factor(&self) -> isize {
        height(self.left()) - height(self.right())
    }
}

impl<K, V> Node<K, V, Size> {
    /// Number of nodes in the subtree rooted here.
    pub fn size(&self) -> usize {
        self.meta.get()
    }

    /// Counts one more node below this one, ahead of attaching it.
    pub(crate) fn grow(&mut self) {
        self.meta = Size(self.meta.0 + 1);
    }
}

/// Height of a possibly empty subtree.
pub(crate) fn height<K, V>(node: Option<&Node<K, V, Height>>) -> isize {
    node.map_or(Height::EMPTY, Node::height)
}

/// Size of a possibly empty subtree.
pub(crate) fn size<K, V>(node: Option<&Node<K, V, Size>>) -> usize {
    node.map_or(0, Node::size)
}

/// Inserts `key`/`value` below `link` and returns the rebuilt subtree along with the value
/// previously stored at `key`, if any.
///
/// Overwriting an existing key replaces the value in place and returns without running
/// `fixup` anywhere, so a repeated `put` never restructures the tree.
pub(crate) fn insert<K: Ord, V, M: Metadata>(
    link: Link<K, V, M>,
    key: K,
    value: V,
    fixup: Fixup<K, V, M>,
) -> (Box<Node<K, V, M>>, Option<V>) {
    let mut node = match link {
        None => return (Node::boxed(key, value), None),
        Some(node) => node,
    };

    match key.cmp(&node.key) {
        Ordering::Less => {
            let (left, old) = insert(node.left.take(), key, value, fixup);
            node.left = Some(left);
            if old.is_some() {
                return (node, old);
            }
        }
        Ordering::Equal => {
            let old = std::mem::replace(&mut node.value, value);
            return (node, Some(old));
        }
        Ordering::Greater => {
            let (right, old) = insert(node.right.take(), key, value, fixup);
            node.right = Some(right);
            if old.is_some() {
                return (node, old);
            }
        }
    }

    (fixup(node), None)
}

/// Removes `key` from below `link` and returns the rebuilt subtree along with the removed
/// value.
///
/// A node with two children is replaced by its in-order successor, which is unlinked from
/// the right subtree.
pub(crate) fn remove<K: Ord, V, M: Metadata>(
    link: Link<K, V, M>,
    key: &K,
    fixup: Fixup<K, V, M>,
) -> (Link<K, V, M>, Option<V>) {
    let mut node = match link {
        None => return (None, None),
        Some(node) => node,
    };

    let removed = match key.cmp(&node.key) {
        Ordering::Less => {
            let (left, removed) = remove(node.left.take(), key, fixup);
            node.left = left;
            removed
        }
        Ordering::Greater => {
            let (right, removed) = remove(node.right.take(), key, fixup);
            node.right = right;
            removed
        }
        Ordering::Equal => {
            let Node {
                value, left, right, ..
            } = *node;
            return match (left, right) {
                (None, right) => (right, Some(value)),
                (left, None) => (left, Some(value)),
                (Some(left), Some(right)) => {
                    let (mut successor, rest) = remove_min(right, fixup);
                    successor.left = Some(left);
                    successor.right = rest;
                    (Some(fixup(successor)), Some(value))
                }
            };
        }
    };

    match removed {
        Some(_) => (Some(fixup(node)), removed),
        None => (Some(node), None),
    }
}

/// Detaches the smallest node below `node`. Returns it (without children) and what is left
/// of the subtree.
pub(crate) fn remove_min<K, V, M: Metadata>(
    mut node: Box<Node<K, V, M>>,
    fixup: Fixup<K, V, M>,
) -> (Box<Node<K, V, M>>, Link<K, V, M>) {
    match node.left.take() {
        None => {
            let rest = node.right.take();
            (node, rest)
        }
        Some(left) => {
            let (min, rest) = remove_min(left, fixup);
            node.left = rest;
            (min, Some(fixup(node)))
        }
    }
}

/// Rotate `root` to the right. This moves the left child up vertically and `root` down
/// vertically. A node without a left child is returned untouched.
///
/// # Diagram
///
/// ```text
///    Option<parent>            Option<parent>
///      /                         /
///   old_root                  new_root
///    /     \                  /     \
/// new_root  z     rotate ->  x    old_root
///  / \                               /  \
/// x   y                             y    z
/// ```
pub(crate) fn rotate_right<K, V, M: Metadata>(
    mut old_root: Box<Node<K, V, M>>,
) -> Box<Node<K, V, M>> {
    let mut new_root = match old_root.left.take() {
        None => return old_root,
        Some(left) => left,
    };
    tracing::trace!("rotating right");

    old_root.left = new_root.right.take();
    old_root.update();

    new_root.right = Some(old_root);
    new_root.update();
    new_root
}

/// Mirror image of [`rotate_right`]: the right child moves up. A node without a right child
/// is returned untouched.
pub(crate) fn rotate_left<K, V, M: Metadata>(
    mut old_root: Box<Node<K, V, M>>,
) -> Box<Node<K, V, M>> {
    let mut new_root = match old_root.right.take() {
        None => return old_root,
        Some(right) => right,
    };
    tracing::trace!("rotating left");

    old_root.right = new_root.left.take();
    old_root.update();

    new_root.left = Some(old_root);
    new_root.update();
    new_root
}

/// The two single rotations.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Rotation {
    Left,
    Right,
}

impl Rotation {
    /// Whether `node` has the child this rotation lifts up.
    fn possible<K, V, M>(self, node: &Node<K, V, M>) -> bool {
        match self {
            Rotation::Left => node.right.is_some(),
            Rotation::Right => node.left.is_some(),
        }
    }

    fn apply<K, V, M: Metadata>(self, node: Box<Node<K, V, M>>) -> Box<Node<K, V, M>> {
        match self {
            Rotation::Left => rotate_left(node),
            Rotation::Right => rotate_right(node),
        }
    }
}

/// Rotates the node holding `key` and recomputes the metadata of its ancestors. Returns
/// whether the node was found and had the child the rotation lifts up.
pub(crate) fn rotate_at<K: Ord, V, M: Metadata>(
    link: &mut Link<K, V, M>,
    key: &K,
    rotation: Rotation,
) -> bool {
    let Some(node) = link.as_deref_mut() else {
        return false;
    };

    let rotated = match key.cmp(&node.key) {
        Ordering::Less => rotate_at(&mut node.left, key, rotation),
        Ordering::Greater => rotate_at(&mut node.right, key, rotation),
        Ordering::Equal => {
            if !rotation.possible(node) {
                return false;
            }
            if let Some(node) = link.take() {
                *link = Some(rotation.apply(node));
            }
            return true;
        }
    };

    if rotated {
        node.update();
    }
    rotated
}

/// Finds the node holding `key`.
pub(crate) fn find<'a, K: Ord, V, M>(
    mut node: Option<&'a Node<K, V, M>>,
    key: &K,
) -> Option<&'a Node<K, V, M>> {
    while let Some(n) = node {
        node = match key.cmp(&n.key) {
            Ordering::Less => n.left(),
            Ordering::Equal => return Some(n),
            Ordering::Greater => n.right(),
        };
    }
    None
}

/// Finds the node holding `key` for in-place value updates.
pub(crate) fn find_mut<'a, K: Ord, V, M>(
    link: &'a mut Link<K, V, M>,
    key: &K,
) -> Option<&'a mut Node<K, V, M>> {
    let mut node = link.as_deref_mut()?;
    loop {
        let next = match key.cmp(&node.key) {
            Ordering::Less => &mut node.left,
            Ordering::Equal => return Some(node),
            Ordering::Greater => &mut node.right,
        };
        node = next.as_deref_mut()?;
    }
}

/// Frees a subtree one node at a time, so a degenerate tree cannot exhaust the stack.
pub(crate) fn dismantle<K, V, M>(link: &mut Link<K, V, M>) {
    let mut pending: Vec<Box<Node<K, V, M>>> = link.take().into_iter().collect();
    while let Some(mut node) = pending.pop() {
        pending.extend(node.left.take());
        pending.extend(node.right.take());
    }
}

/// Number of edges from the root down to the node holding `key`.
pub(crate) fn depth<K: Ord, V, M>(mut node: Option<&Node<K, V, M>>, key: &K) -> Option<usize> {
    let mut depth = 0;
    while let Some(n) = node {
        node = match key.cmp(&n.key) {
            Ordering::Less => n.left(),
            Ordering::Equal => return Some(depth),
            Ordering::Greater => n.right(),
        };
        depth += 1;
    }
    None
}

/// The smallest key strictly greater than `key`, whether or not `key` itself is present.
///
/// Descends from the root remembering the last node where the search turned left. If `key`
/// is found, the answer is the minimum of its right subtree when there is one.
pub(crate) fn successor<'a, K: Ord, V, M>(
    mut node: Option<&'a Node<K, V, M>>,
    key: &K,
) -> Option<&'a K> {
    let mut turned_left = None;
    while let Some(n) = node {
        match key.cmp(&n.key) {
            Ordering::Less => {
                turned_left = Some(&n.key);
                node = n.left();
            }
            Ordering::Equal => {
                if let Some(right) = n.right() {
                    return Some(&right.min().key);
                }
                break;
            }
            Ordering::Greater => node = n.right(),
        }
    }
    turned_left
}

/// The largest key strictly smaller than `key`. See [`successor`].
pub(crate) fn predecessor<'a, K: Ord, V, M>(
    mut node: Option<&'a Node<K, V, M>>,
    key: &K,
) -> Option<&'a K> {
    let mut turned_right = None;
    while let Some(n) = node {
        match key.cmp(&n.key) {
            Ordering::Greater => {
                turned_right = Some(&n.key);
                node = n.right();
            }
            Ordering::Equal => {
                if let Some(left) = n.left() {
                    return Some(&left.max().key);
                }
                break;
            }
            Ordering::Less => node = n.left(),
        }
    }
    turned_right
}

/// Keys grouped by depth, root first. Breadth-first over `(node, depth)` pairs.
pub(crate) fn levels<K, V, M>(root: Option<&Node<K, V, M>>) -> Vec<Vec<&K>> {
    let mut levels: Vec<Vec<&K>> = Vec::new();
    let mut queue = VecDeque::new();
    queue.extend(root.map(|n| (n, 0)));

    while let Some((node, depth)) = queue.pop_front() {
        if levels.len() == depth {
            levels.push(Vec::new());
        }
        levels[depth].push(&node.key);
        queue.extend(node.left().map(|n| (n, depth + 1)));
        queue.extend(node.right().map(|n| (n, depth + 1)));
    }

    levels
}

/// Checks the ordering invariant: every key in a left subtree is smaller than its parent's
/// key and every key in a right subtree is larger.
pub(crate) fn is_bst<K: Ord, V, M>(root: Option<&Node<K, V, M>>) -> bool {
    fn within<K: Ord, V, M>(
        node: Option<&Node<K, V, M>>,
        low: Option<&K>,
        high: Option<&K>,
    ) -> bool {
        let Some(node) = node else {
            return true;
        };
        if low.map_or(false, |low| node.key <= *low)
            || high.map_or(false, |high| node.key >= *high)
        {
            return false;
        }
        within(node.left(), low, Some(&node.key)) && within(node.right(), Some(&node.key), high)
    }

    within(root, None, None)
}

/// Checks that every node's metadata matches what its children imply.
pub(crate) fn metadata_consistent<K, V, M>(root: Option<&Node<K, V, M>>) -> bool
where
    M: Metadata + PartialEq,
{
    fn check<K, V, M: Metadata + PartialEq>(node: Option<&Node<K, V, M>>) -> Option<M> {
        let node = node?;
        let left = match node.left() {
            Some(left) => Some(check(Some(left))?),
            None => None,
        };
        let right = match node.right() {
            Some(right) => Some(check(Some(right))?),
            None => None,
        };
        (M::recompute(left, right) == node.meta).then_some(node.meta)
    }

    root.map_or(true, |root| check(Some(root)).is_some())
}
