//! Huffman code trees over bytes.
//!
//! A [`CodeTree`] is built once from a frequency histogram by repeatedly merging the two
//! least frequent subtrees, then never changes. A symbol's code is its root-to-leaf path,
//! `'0'` for a left turn and `'1'` for a right one, so no code is a prefix of another.
//! Bit strings cross the public boundary as text made of `'0'` and `'1'`.
//!
//! # Examples
//!
//! ```
//! use search_trees::huffman::CodeTree;
//!
//! let encoded = CodeTree::encode("ABRACABABRA")?;
//! assert_eq!(encoded.tree.code_of(b'A'), Some("0"));
//! assert_eq!(encoded.bits.len(), 20);
//! assert_eq!(encoded.decode()?, b"ABRACABABRA");
//!
//! assert!(encoded.tree.is_code("110"));
//! assert!(!encoded.tree.is_code("11"));
//! # Ok::<(), search_trees::Error>(())
//! ```

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use tracing::debug;

use crate::error::{Error, Result};

/// Byte alphabet size.
const R: usize = 256;

/// How equal-frequency subtrees are ordered when they are taken off the queue.
///
/// Only the prefix-free property and round trips are guaranteed in general; a fixed tie
/// break additionally makes the code table reproducible.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TieBreak {
    /// Older subtrees first. Leaves are created in byte order, merged subtrees after them.
    #[default]
    Insertion,
    /// The subtree holding the smallest symbol first.
    LowestSymbol,
}

/// A node of a code tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CodeNode {
    /// A symbol and how often it occurred.
    Leaf {
        /// The byte this leaf encodes.
        symbol: u8,
        /// Occurrences of `symbol`.
        frequency: usize,
    },
    /// A merge of two subtrees. Its frequency is the sum of theirs.
    Internal {
        /// Combined frequency.
        frequency: usize,
        /// Reached by a `'0'` bit.
        left: Box<CodeNode>,
        /// Reached by a `'1'` bit.
        right: Box<CodeNode>,
    },
}

impl CodeNode {
    /// Total frequency of the symbols below this node.
    pub fn frequency(&self) -> usize {
        match self {
            CodeNode::Leaf { frequency, .. } | CodeNode::Internal { frequency, .. } => *frequency,
        }
    }

    /// Whether this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, CodeNode::Leaf { .. })
    }

    fn min_symbol(&self) -> u8 {
        match self {
            CodeNode::Leaf { symbol, .. } => *symbol,
            CodeNode::Internal { left, right, .. } => left.min_symbol().min(right.min_symbol()),
        }
    }
}

/// A queue entry; the heap is a max-heap so the ordering is reversed.
struct Pending {
    tie: usize,
    node: CodeNode,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .node
            .frequency()
            .cmp(&self.node.frequency())
            .then_with(|| other.tie.cmp(&self.tie))
    }
}

/// Assigns codes by a pre-order walk, pushing and popping one bit around each step.
fn assign_codes(node: &CodeNode, code: &mut String, out: &mut Vec<(u8, String)>) {
    match node {
        CodeNode::Leaf { symbol, .. } => out.push((*symbol, code.clone())),
        CodeNode::Internal { left, right, .. } => {
            code.push('0');
            assign_codes(left, code, out);
            code.pop();
            code.push('1');
            assign_codes(right, code, out);
            code.pop();
        }
    }
}

/// An immutable Huffman tree with its code table.
#[derive(Clone, Debug)]
pub struct CodeTree {
    root: CodeNode,
    table: BTreeMap<u8, String>,
    longest: u8,
}

/// The output of [`CodeTree::encode`]: the bits and the tree needed to read them back.
#[derive(Clone, Debug)]
pub struct Encoded {
    /// The encoded text as `'0'`/`'1'` characters.
    pub bits: String,
    /// The tree built from the text's own frequencies.
    pub tree: CodeTree,
}

impl Encoded {
    /// Decodes [`Encoded::bits`] with [`Encoded::tree`].
    pub fn decode(&self) -> Result<Vec<u8>> {
        self.tree.decode(&self.bits)
    }
}

impl CodeTree {
    /// Builds a tree from the byte frequencies of `text`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `text` is empty.
    pub fn build(text: impl AsRef<[u8]>) -> Result<Self> {
        Self::build_with(text, TieBreak::default())
    }

    /// Like [`CodeTree::build`] with an explicit tie break.
    pub fn build_with(text: impl AsRef<[u8]>, tie_break: TieBreak) -> Result<Self> {
        let mut histogram = [0usize; R];
        for &byte in text.as_ref() {
            histogram[usize::from(byte)] += 1;
        }

        Self::from_frequencies(
            histogram
                .iter()
                .enumerate()
                .map(|(symbol, &frequency)| (symbol as u8, frequency)),
            tie_break,
        )
    }

    /// Builds a tree from `(symbol, frequency)` pairs. Symbols with frequency 0 are skipped
    /// and a repeated symbol keeps its last frequency.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if no symbol has a positive frequency.
    pub fn from_frequencies(
        frequencies: impl IntoIterator<Item = (u8, usize)>,
        tie_break: TieBreak,
    ) -> Result<Self> {
        let frequencies: BTreeMap<u8, usize> = frequencies
            .into_iter()
            .filter(|&(_, frequency)| frequency > 0)
            .collect();
        if frequencies.is_empty() {
            return Err(Error::invalid_argument(
                "cannot build a code tree without any symbols",
            ));
        }

        let mut sequence = 0;
        let mut next_tie = |node: &CodeNode| match tie_break {
            TieBreak::Insertion => {
                sequence += 1;
                sequence
            }
            TieBreak::LowestSymbol => usize::from(node.min_symbol()),
        };

        let mut queue = BinaryHeap::with_capacity(frequencies.len());
        for (symbol, frequency) in frequencies {
            let node = CodeNode::Leaf { symbol, frequency };
            queue.push(Pending {
                tie: next_tie(&node),
                node,
            });
        }
        let symbols = queue.len();

        let root = loop {
            let first = queue.pop().map(|p| p.node);
            let second = queue.pop().map(|p| p.node);
            match (first, second) {
                (Some(left), Some(right)) => {
                    let node = CodeNode::Internal {
                        frequency: left.frequency() + right.frequency(),
                        left: Box::new(left),
                        right: Box::new(right),
                    };
                    queue.push(Pending {
                        tie: next_tie(&node),
                        node,
                    });
                }
                (Some(root), None) => break root,
                (None, _) => unreachable!("the queue starts non-empty and merges keep one node"),
            }
        };

        let mut codes = Vec::with_capacity(symbols);
        match &root {
            // A lone symbol still needs one bit per occurrence.
            CodeNode::Leaf { symbol, .. } => codes.push((*symbol, "0".to_string())),
            internal => assign_codes(internal, &mut String::new(), &mut codes),
        }

        let longest = codes
            .iter()
            .reduce(|best, entry| if entry.1.len() > best.1.len() { entry } else { best })
            .map_or(0, |(symbol, _)| *symbol);

        debug!(
            symbols,
            total = root.frequency(),
            ?tie_break,
            "built code tree"
        );
        Ok(Self {
            root,
            table: codes.into_iter().collect(),
            longest,
        })
    }

    /// Builds a tree from `text` and encodes `text` with it.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `text` is empty.
    pub fn encode(text: impl AsRef<[u8]>) -> Result<Encoded> {
        let text = text.as_ref();
        let tree = Self::build(text)?;
        let bits = tree.encode_with(text)?;
        Ok(Encoded { bits, tree })
    }

    /// Encodes `text` with this tree's code table.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `text` holds a byte this tree has no code for.
    pub fn encode_with(&self, text: impl AsRef<[u8]>) -> Result<String> {
        let mut bits = String::new();
        for &byte in text.as_ref() {
            let code = self.code_of(byte).ok_or_else(|| {
                Error::invalid_argument(format!("no code for byte {:#04x}", byte))
            })?;
            bits.push_str(code);
        }
        Ok(bits)
    }

    /// Decodes a `'0'`/`'1'` string.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidEncoding`] on a character other than `'0'` or `'1'`, on a bit that
    /// leads nowhere, or when the input ends in the middle of a code. `position` is the
    /// offending bit, or the start of the unfinished code.
    pub fn decode(&self, bits: &str) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut node = &self.root;
        let mut code_start = 0;

        for (position, bit) in bits.bytes().enumerate() {
            node = match (node, bit) {
                (CodeNode::Internal { left, .. }, b'0') => &**left,
                (CodeNode::Internal { right, .. }, b'1') => &**right,
                (CodeNode::Leaf { .. }, b'0') => node,
                (CodeNode::Leaf { .. }, b'1') => {
                    return Err(Error::InvalidEncoding {
                        position,
                        reason: "no code continues with this bit",
                    })
                }
                _ => {
                    return Err(Error::InvalidEncoding {
                        position,
                        reason: "expected '0' or '1'",
                    })
                }
            };

            if let CodeNode::Leaf { symbol, .. } = node {
                out.push(*symbol);
                node = &self.root;
                code_start = position + 1;
            }
        }

        if code_start != bits.len() {
            return Err(Error::InvalidEncoding {
                position: code_start,
                reason: "input ends inside a code",
            });
        }
        Ok(out)
    }

    /// Whether `bits` is exactly one code: the walk reaches a leaf on its last bit and not
    /// before.
    pub fn is_code(&self, bits: &str) -> bool {
        let mut node = &self.root;
        let last = match bits.len().checked_sub(1) {
            Some(last) => last,
            None => return false,
        };

        for (i, bit) in bits.bytes().enumerate() {
            node = match (node, bit) {
                (CodeNode::Internal { left, .. }, b'0') => &**left,
                (CodeNode::Internal { right, .. }, b'1') => &**right,
                (CodeNode::Leaf { .. }, b'0') if i == 0 => node,
                _ => return false,
            };
            if node.is_leaf() && i != last {
                return false;
            }
        }
        node.is_leaf()
    }

    /// The root of the tree.
    pub fn root(&self) -> &CodeNode {
        &self.root
    }

    /// Every symbol's code, by symbol.
    pub fn code_table(&self) -> &BTreeMap<u8, String> {
        &self.table
    }

    /// The code of `symbol`, if it occurs.
    pub fn code_of(&self, symbol: u8) -> Option<&str> {
        self.table.get(&symbol).map(String::as_str)
    }

    /// The longest code, the leftmost one on ties.
    pub fn longest_code(&self) -> &str {
        self.code_of(self.longest).unwrap_or_default()
    }

    /// The symbol owning [`CodeTree::longest_code`].
    pub fn symbol_with_longest_code(&self) -> u8 {
        self.longest
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Always `false`: a tree has at least one symbol.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
