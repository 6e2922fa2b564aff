use search_trees::PrefixTrie;

use std::collections::BTreeMap;

use quickcheck_macros::quickcheck;

use crate::Op;

#[quickcheck]
fn matches_btreemap(ops: Vec<Op<String, u8>>) -> bool {
    let mut trie = PrefixTrie::new();
    let mut model = BTreeMap::new();
    for op in ops {
        let agreed = match op {
            Op::Insert(k, v) => trie.put(&k, v) == model.insert(k.into_bytes(), v),
            Op::Remove(k) => trie.remove_word(&k) == model.remove(k.as_bytes()),
        };
        if !agreed {
            return false;
        }
    }

    trie.len() == model.len()
        && trie.entries().into_iter().eq(model.iter().map(|(k, v)| (k.clone(), v)))
}

#[quickcheck]
fn shortest_and_longest(keys: Vec<Vec<u8>>) -> bool {
    let trie: PrefixTrie<()> = keys.iter().map(|k| (k, ())).collect();
    let shortest = keys.iter().map(Vec::len).min();
    let longest = keys.iter().map(Vec::len).max();

    trie.find_shortest_word().map(|w| w.len()) == shortest
        && trie.find_longest_word().map(|w| w.len()) == longest
}

#[test]
fn dictionary_words() {
    let words = "she sells sea shells by the sea shore";
    let mut trie = PrefixTrie::new();
    for (i, word) in words.split_whitespace().enumerate() {
        trie.put(word, i);
    }

    assert_eq!(trie.len(), 7);
    assert_eq!(trie.get("sea"), Some(&6));
    assert_eq!(trie.count_all_keys_with_prefix("sh"), 3);
    assert_eq!(
        trie.get_all_keys_with_prefix("s"),
        vec![
            b"sea".to_vec(),
            b"sells".to_vec(),
            b"she".to_vec(),
            b"shells".to_vec(),
            b"shore".to_vec(),
        ]
    );
    assert_eq!(trie.find_first_word(), Some(b"by".to_vec()));
    assert_eq!(trie.find_last_word(), Some(b"the".to_vec()));
    assert_eq!(trie.find_longest_word(), Some(b"shells".to_vec()));
    assert_eq!(trie.find_shortest_word(), Some(b"by".to_vec()));
}
