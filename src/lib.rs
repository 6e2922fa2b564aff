//! This crate exposes a handful of search trees, mostly for educational purposes.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored records. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` will typically store
//! a key and a value and will sometimes have child `Node`s. The most important
//! invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    key less than its own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    key greater than its own key.
//!
//! Searching takes `O(height)`, and sorted iteration falls out of visiting the
//! left subtree, then the subtree root, then the right subtree. The binary trees
//! here differ in what each node remembers about its subtree:
//!
//! - [`BalancedMap`] keeps heights and rebalances itself (an AVL tree), so its height
//!   stays `O(lg N)`.
//! - [`RotatingOrderedSet`] keeps subtree sizes and never rebalances on its own;
//!   rotations are requested by the caller.
//!
//! ## Beyond binary trees
//!
//! - [`MultiwayTree`] is a B-tree: wide nodes holding between `t - 1` and `2t - 1`
//!   keys, all leaves at the same depth.
//! - [`PrefixTrie`] indexes byte strings one byte per level and answers prefix queries.
//! - [`CodeTree`] is a Huffman tree built from symbol frequencies.
//!
//! Every structure is single-threaded and owns its nodes outright; share one across
//! threads behind a lock.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod avl;
pub mod btree;
pub mod error;
pub mod huffman;
pub mod iter;
pub mod metric;
pub mod node;
pub mod rotating;
pub mod trie;


pub use avl::BalancedMap;
pub use btree::{Degree, MultiwayTree};
pub use error::{Error, Result};
pub use huffman::CodeTree;
pub use rotating::RotatingOrderedSet;
pub use trie::PrefixTrie;
