//! A 256-way trie keyed by byte strings.
//!
//! Each node owns one child slot per possible byte and an optional value marking the end of
//! a key. Removing a key prunes every node left without a value or children, so every leaf
//! of the trie ends a key. The prefix queries lean on that: a greedy walk down the first
//! (or last) occupied slot always reaches a key.
//!
//! # Examples
//!
//! ```
//! use search_trees::trie::PrefixTrie;
//!
//! let mut trie = PrefixTrie::new();
//! trie.put("to", 7);
//! trie.put("tea", 3);
//! trie.put("ted", 4);
//! trie.put("ten", 12);
//! trie.put("in", 5);
//!
//! assert_eq!(trie.get("to"), Some(&7));
//! assert_eq!(trie.get("t"), None);
//! assert_eq!(trie.count_all_keys_with_prefix("te"), 3);
//! assert_eq!(trie.find_first_word(), Some(b"in".to_vec()));
//!
//! assert_eq!(trie.remove_word("ten"), Some(12));
//! assert_eq!(trie.get_all_keys_with_prefix("te"), vec![b"tea".to_vec(), b"ted".to_vec()]);
//! ```

use std::fmt;

use tracing::trace;

/// Alphabet size: one child per byte value.
const R: usize = 256;

#[derive(Clone)]
struct TrieNode<V> {
    value: Option<V>,
    children: [Option<Box<TrieNode<V>>>; R],
}

impl<V> TrieNode<V> {
    fn new() -> Self {
        Self {
            value: None,
            children: std::array::from_fn(|_| None),
        }
    }

    /// Occupied child slots in byte order.
    fn children(&self) -> impl DoubleEndedIterator<Item = (u8, &TrieNode<V>)> {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(byte, child)| Some((byte as u8, child.as_deref()?)))
    }

    fn is_prunable(&self) -> bool {
        self.value.is_none() && self.children.iter().all(Option::is_none)
    }

    fn find(&self, key: &[u8]) -> Option<&TrieNode<V>> {
        key.iter()
            .try_fold(self, |node, &byte| node.children[usize::from(byte)].as_deref())
    }
}

/// Pre-order collection of every key below `node`. `path` holds the bytes leading to
/// `node` and is restored before returning.
fn collect<'a, V>(node: &'a TrieNode<V>, path: &mut Vec<u8>, out: &mut Vec<(Vec<u8>, &'a V)>) {
    if let Some(value) = &node.value {
        out.push((path.clone(), value));
    }
    for (byte, child) in node.children() {
        path.push(byte);
        collect(child, path, out);
        path.pop();
    }
}

fn count<V>(node: &TrieNode<V>) -> usize {
    let below: usize = node.children().map(|(_, child)| count(child)).sum();
    usize::from(node.value.is_some()) + below
}

/// Clears the value at the end of `key` and prunes emptied nodes on the way back up.
fn remove<V>(node: &mut TrieNode<V>, key: &[u8]) -> Option<V> {
    let Some((&byte, rest)) = key.split_first() else {
        return node.value.take();
    };

    let slot = &mut node.children[usize::from(byte)];
    let child = slot.as_mut()?;
    let removed = remove(child, rest)?;
    if child.is_prunable() {
        trace!(byte, depth = key.len(), "pruned trie node");
        *slot = None;
    }
    Some(removed)
}

/// A map from byte strings to `V`.
#[derive(Clone)]
pub struct PrefixTrie<V> {
    root: Box<TrieNode<V>>,
    len: usize,
}

impl<V> Default for PrefixTrie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> PrefixTrie<V> {
    /// An empty trie. The root always exists and carries the value of the empty key.
    pub fn new() -> Self {
        Self {
            root: Box::new(TrieNode::new()),
            len: 0,
        }
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the trie holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Associates `value` with `key`, creating nodes along the key's path as needed.
    /// Returns the value previously stored under `key`.
    pub fn put(&mut self, key: impl AsRef<[u8]>, value: V) -> Option<V> {
        let mut node = &mut self.root;
        for &byte in key.as_ref() {
            node = node.children[usize::from(byte)]
                .get_or_insert_with(|| Box::new(TrieNode::new()));
        }

        let old = node.value.replace(value);
        if old.is_none() {
            self.len += 1;
        }
        old
    }

    /// The value stored under `key`. A key that is only a prefix of stored keys misses.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&V> {
        self.root.find(key.as_ref())?.value.as_ref()
    }

    /// Whether `key` is stored.
    pub fn contains(&self, key: impl AsRef<[u8]>) -> bool {
        self.get(key).is_some()
    }

    /// Removes `key`, returning its value. Nodes left with neither a value nor children
    /// are dropped; the root is never dropped.
    pub fn remove_word(&mut self, key: impl AsRef<[u8]>) -> Option<V> {
        let removed = remove(&mut self.root, key.as_ref());
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Every key with its value, in lexicographic byte order.
    pub fn entries(&self) -> Vec<(Vec<u8>, &V)> {
        self.entries_with_prefix(&[])
    }

    fn entries_with_prefix(&self, prefix: &[u8]) -> Vec<(Vec<u8>, &V)> {
        let mut out = Vec::new();
        if let Some(node) = self.root.find(prefix) {
            let mut path = prefix.to_vec();
            collect(node, &mut path, &mut out);
        }
        out
    }

    /// Every key, in lexicographic byte order.
    pub fn get_all_keys(&self) -> Vec<Vec<u8>> {
        self.get_all_keys_with_prefix(b"")
    }

    /// Every key starting with `prefix` (including `prefix` itself), in lexicographic order.
    pub fn get_all_keys_with_prefix(&self, prefix: impl AsRef<[u8]>) -> Vec<Vec<u8>> {
        self.entries_with_prefix(prefix.as_ref())
            .into_iter()
            .map(|(key, _)| key)
            .collect()
    }

    /// How many keys start with `prefix`.
    pub fn count_all_keys_with_prefix(&self, prefix: impl AsRef<[u8]>) -> usize {
        self.root.find(prefix.as_ref()).map_or(0, count)
    }

    /// The lexicographically smallest key.
    pub fn find_first_word(&self) -> Option<Vec<u8>> {
        let mut node = &*self.root;
        let mut path = Vec::new();
        while node.value.is_none() {
            let (byte, child) = node.children().next()?;
            path.push(byte);
            node = child;
        }
        Some(path)
    }

    /// The lexicographically largest key.
    ///
    /// A key sorts before all of its extensions, so the walk keeps taking the last child
    /// until it reaches a leaf.
    pub fn find_last_word(&self) -> Option<Vec<u8>> {
        let mut node = &*self.root;
        let mut path = Vec::new();
        while let Some((byte, child)) = node.children().next_back() {
            path.push(byte);
            node = child;
        }
        node.value.as_ref().map(|_| path)
    }

    /// The longest key; the lexicographically first one on ties.
    pub fn find_longest_word(&self) -> Option<Vec<u8>> {
        self.get_all_keys()
            .into_iter()
            .reduce(|best, key| if key.len() > best.len() { key } else { best })
    }

    /// The shortest key; the lexicographically first one on ties.
    pub fn find_shortest_word(&self) -> Option<Vec<u8>> {
        self.get_all_keys()
            .into_iter()
            .reduce(|best, key| if key.len() < best.len() { key } else { best })
    }
}

impl<V: fmt::Debug> fmt::Debug for PrefixTrie<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.entries()
                    .into_iter()
                    .map(|(key, value)| (String::from_utf8_lossy(&key).into_owned(), value)),
            )
            .finish()
    }
}

impl<K: AsRef<[u8]>, V> Extend<(K, V)> for PrefixTrie<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K: AsRef<[u8]>, V> FromIterator<(K, V)> for PrefixTrie<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut trie = Self::new();
        trie.extend(iter);
        trie
    }
}
