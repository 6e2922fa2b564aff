use search_trees::BalancedMap;

use std::collections::{HashMap, HashSet};

use quickcheck_macros::quickcheck;

use crate::Op;

/// Applies a set of operations to a map and a hashmap.
/// This way we can ensure that after a random smattering of puts
/// and removes we have the same set of keys in the map.
fn do_ops<K, V>(ops: &[Op<K, V>], map: &mut BalancedMap<K, V>, model: &mut HashMap<K, V>) -> bool
where
    K: std::hash::Hash + Eq + Clone + Ord,
    V: PartialEq + Clone,
{
    for op in ops {
        let agreed = match op {
            Op::Insert(k, v) => map.put(k.clone(), v.clone()) == model.insert(k.clone(), v.clone()),
            Op::Remove(k) => map.remove(k) == model.remove(k),
        };
        if !agreed || !map.is_balanced() {
            return false;
        }
    }

    true
}

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8, i8>>) -> bool {
    let mut map = BalancedMap::new();
    let mut model = HashMap::new();

    do_ops(&ops, &mut map, &mut model)
        && map.len() == model.len()
        && model.keys().all(|key| map.get(key) == model.get(key))
}

#[quickcheck]
fn contains(xs: Vec<i8>) -> bool {
    let map: BalancedMap<_, _> = xs.iter().map(|x| (*x, *x)).collect();

    xs.iter().all(|x| map.get(x) == Some(x))
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let map: BalancedMap<_, _> = xs.iter().map(|x| (*x, *x)).collect();
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| map.get(x).is_none())
}

#[quickcheck]
fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut map: BalancedMap<_, _> = xs.iter().map(|x| (*x, *x)).collect();
    for delete in &deletes {
        map.remove(delete);
    }

    let mut still_present = xs;
    for delete in &deletes {
        // We may have inserted the same value multiple times - delete each one.
        while let Some(pos) = still_present.iter().position(|x| x == delete) {
            still_present.swap_remove(pos);
        }
    }

    deletes.iter().all(|x| map.get(x).is_none())
        && still_present.iter().all(|x| map.get(x).is_some())
        && map.is_balanced()
        && map.is_bst()
}

#[quickcheck]
fn height_is_logarithmic(xs: Vec<u16>) -> bool {
    let map: BalancedMap<_, _> = xs.into_iter().map(|x| (x, ())).collect();
    // An AVL tree with n nodes is at most about 1.44 lg(n + 2) tall.
    let bound = 1.45 * ((map.len() + 2) as f64).log2();

    map.height() as f64 <= bound
}

#[test_log::test]
fn sequential_puts_stay_balanced() {
    let mut map = BalancedMap::new();
    for k in 0..1024 {
        map.put(k, k.to_string());
    }

    assert_eq!(map.len(), 1024);
    assert_eq!(map.height(), 10);
    assert_eq!(map.first_key(), Some(&0));
    assert_eq!(map.last_key(), Some(&1023));
    assert!(map.keys().copied().eq(0..1024));
}
