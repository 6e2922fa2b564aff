use search_trees::btree::{Degree, MultiwayTree};
use search_trees::Error;

use std::collections::BTreeSet;

use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

#[quickcheck]
fn behaves_like_a_set(xs: Vec<i16>, probes: Vec<i16>, t: u8) -> TestResult {
    let Ok(mut tree) = MultiwayTree::new(usize::from(t)) else {
        return TestResult::discard();
    };
    let mut model = BTreeSet::new();
    for x in xs {
        if tree.insert(x) != model.insert(x) {
            return TestResult::failed();
        }
    }

    TestResult::from_bool(
        tree.is_valid()
            && tree.len() == model.len()
            && tree.keys().into_iter().eq(model.iter())
            && probes.iter().all(|p| tree.contains(p) == model.contains(p))
            && tree.min().ok() == model.first()
            && tree.max().ok() == model.last(),
    )
}

#[quickcheck]
fn all_leaves_share_a_level(xs: Vec<u16>) -> bool {
    let mut tree = MultiwayTree::with_degree(Degree::DEFAULT);
    tree.extend(xs);
    let levels = tree.levels();

    // Every node on the last level is a leaf, and nothing else is.
    levels.len() == tree.height() + 1
        && tree
            .keys()
            .into_iter()
            .all(|k| tree.level(k).map_or(false, |level| level <= tree.height()))
}

#[test]
fn degree_from_config_text() {
    let degree: Degree = " 3 ".parse().unwrap();
    let tree: MultiwayTree<u8> = MultiwayTree::with_degree(degree);
    assert_eq!(tree.degree().get(), 3);
    assert_eq!(tree.degree().to_string(), "3");

    assert!(matches!("0".parse::<Degree>(), Err(Error::InvalidArgument(_))));
    assert!(matches!("-2".parse::<Degree>(), Err(Error::InvalidArgument(_))));
}

#[test]
fn textbook_sequence() {
    let mut tree = MultiwayTree::new(3).unwrap();
    for k in [8, 9, 10, 11, 15, 20, 17, 22, 25, 16, 12, 13, 14, 26, 27] {
        assert!(tree.insert(k));
    }

    assert!(tree.contains(&20));
    assert!(!tree.contains(&99));
    assert!(tree.is_valid());
    assert_eq!(tree.height(), 1);
    assert_eq!(
        tree.to_string(),
        "[ 10 13 17 ]\n[ 8 9 ] [ 11 12 ] [ 14 15 16 ] [ 20 22 25 26 27 ]\n"
    );
}
