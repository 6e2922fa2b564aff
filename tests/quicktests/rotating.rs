use search_trees::rotating::{is_postorder, RotatingOrderedSet};

use std::collections::BTreeMap;

use quickcheck_macros::quickcheck;

use crate::Op;

fn apply(ops: &[Op<i8, i8>]) -> (RotatingOrderedSet<i8, i8>, BTreeMap<i8, i8>) {
    let mut tree = RotatingOrderedSet::new();
    let mut model = BTreeMap::new();
    for op in ops {
        match op {
            Op::Insert(k, v) => {
                tree.put(*k, *v);
                model.insert(*k, *v);
            }
            Op::Remove(k) => {
                tree.delete(k);
                model.remove(k);
            }
        }
    }
    (tree, model)
}

#[quickcheck]
fn matches_btreemap(ops: Vec<Op<i8, i8>>) -> bool {
    let (tree, model) = apply(&ops);

    tree.size() == model.len()
        && tree.sizes_consistent()
        && tree.is_bst()
        && tree.iter().eq(model.iter())
}

#[quickcheck]
fn rotations_keep_the_set(ops: Vec<Op<i8, i8>>, pivots: Vec<(i8, bool)>) -> bool {
    let (mut tree, model) = apply(&ops);
    for (pivot, left) in pivots {
        if left {
            tree.rotate_left(&pivot);
        } else {
            tree.rotate_right(&pivot);
        }
    }

    tree.sizes_consistent() && tree.is_bst() && tree.iter().eq(model.iter())
}

#[quickcheck]
fn size_of_counts_the_subtree(xs: Vec<i8>) -> bool {
    let tree: RotatingOrderedSet<_, _> = xs.iter().map(|x| (*x, ())).collect();
    let preorder = tree.preorder();

    preorder.iter().all(|k| tree.size_of(k) >= 1)
        && tree.root().map_or(0, |r| r.size()) == tree.size()
}

#[quickcheck]
fn postorder_round_trips(xs: Vec<i8>) -> bool {
    let tree: RotatingOrderedSet<_, _> = xs.iter().map(|x| (*x, ())).collect();
    let postorder: Vec<i8> = tree.postorder().into_iter().copied().collect();

    if !is_postorder(&postorder) {
        return false;
    }
    match RotatingOrderedSet::from_postorder(postorder, ()) {
        Ok(rebuilt) => rebuilt.preorder() == tree.preorder(),
        Err(_) => false,
    }
}

#[quickcheck]
fn from_sorted_is_minimal(xs: Vec<u8>) -> bool {
    let model: BTreeMap<_, _> = xs.into_iter().map(|x| (x, x)).collect();
    let Ok(tree) = RotatingOrderedSet::from_sorted(model.clone()) else {
        return false;
    };
    let n = tree.size();
    let minimal = if n == 0 {
        -1
    } else {
        (usize::BITS - n.leading_zeros()) as isize - 1
    };

    tree.height() == minimal && tree.iter().eq(model.iter())
}

#[quickcheck]
fn closest_is_nearest(xs: Vec<i16>, probe: i16) -> bool {
    let tree: RotatingOrderedSet<_, _> = xs.iter().map(|x| (*x, ())).collect();
    let best = xs
        .iter()
        .map(|x| (i32::from(*x) - i32::from(probe)).abs())
        .min();

    match (tree.search_closest(&probe), best) {
        (Some(found), Some(best)) => (i32::from(*found) - i32::from(probe)).abs() == best,
        (None, None) => true,
        _ => false,
    }
}
