//! In-order iterators over the binary trees.
//!
//! The iterators borrow the tree, so the tree cannot change while one is alive and every
//! iterator sees the tree as it was when it was created. Cloning an iterator (or asking the
//! tree for a new one) starts the walk over.

use std::iter::FusedIterator;

use crate::node::Node;

/// An in-order iterator over the entries of a tree, smallest key first.
///
/// Keeps the left spine of the unvisited part of the tree on an explicit stack, so memory
/// use is bounded by the height of the tree.
pub struct Iter<'a, K, V, M> {
    stack: Vec<&'a Node<K, V, M>>,
    remaining: usize,
}

impl<'a, K, V, M> Iter<'a, K, V, M> {
    pub(crate) fn new(root: Option<&'a Node<K, V, M>>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<&'a Node<K, V, M>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left();
        }
    }
}

// Manual impl so `K`, `V` and `M` don't have to be `Clone`.
impl<K, V, M> Clone for Iter<'_, K, V, M> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V, M> Iterator for Iter<'a, K, V, M> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right());
        self.remaining = self.remaining.saturating_sub(1);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, M> ExactSizeIterator for Iter<'_, K, V, M> {}
impl<K, V, M> FusedIterator for Iter<'_, K, V, M> {}

/// An in-order iterator over the keys of a tree.
pub struct Keys<'a, K, V, M>(pub(crate) Iter<'a, K, V, M>);

impl<K, V, M> Clone for Keys<'_, K, V, M> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<'a, K, V, M> Iterator for Keys<'a, K, V, M> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V, M> ExactSizeIterator for Keys<'_, K, V, M> {}
impl<K, V, M> FusedIterator for Keys<'_, K, V, M> {}

/// An iterator over the values of a tree, in key order.
pub struct Values<'a, K, V, M>(pub(crate) Iter<'a, K, V, M>);

impl<K, V, M> Clone for Values<'_, K, V, M> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<'a, K, V, M> Iterator for Values<'a, K, V, M> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V, M> ExactSizeIterator for Values<'_, K, V, M> {}
impl<K, V, M> FusedIterator for Values<'_, K, V, M> {}
