use search_trees::huffman::{CodeTree, TieBreak};
use search_trees::Error;

use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

#[quickcheck]
fn round_trip(text: String) -> TestResult {
    if text.is_empty() {
        return TestResult::from_bool(matches!(
            CodeTree::encode(&text),
            Err(Error::InvalidArgument(_))
        ));
    }

    let encoded = match CodeTree::encode(&text) {
        Ok(encoded) => encoded,
        Err(e) => return TestResult::error(e.to_string()),
    };
    TestResult::from_bool(encoded.decode().ok().as_deref() == Some(text.as_bytes()))
}

#[quickcheck]
fn codes_are_prefix_free(text: Vec<u8>) -> TestResult {
    let Ok(tree) = CodeTree::build_with(&text, TieBreak::LowestSymbol) else {
        return TestResult::discard();
    };
    let codes: Vec<&String> = tree.code_table().values().collect();

    TestResult::from_bool(codes.iter().enumerate().all(|(i, a)| {
        codes
            .iter()
            .enumerate()
            .all(|(j, b)| i == j || !a.starts_with(b.as_str()))
    }))
}

#[quickcheck]
fn two_symbols_get_one_bit_each(a: u8, b: u8) -> TestResult {
    if a == 0 || b == 0 {
        return TestResult::discard();
    }
    let tree = CodeTree::from_frequencies(
        [(b'x', usize::from(a)), (b'y', usize::from(b))],
        TieBreak::Insertion,
    );

    TestResult::from_bool(tree.map_or(false, |tree| {
        tree.code_table().values().all(|code| code.len() == 1)
    }))
}

#[test]
fn shorter_codes_for_frequent_symbols() {
    let text = "aaaaaaaabbbbccd";
    let tree = CodeTree::build(text).unwrap();
    let len = |symbol| tree.code_of(symbol).map_or(usize::MAX, str::len);

    assert!(len(b'a') <= len(b'b'));
    assert!(len(b'b') <= len(b'c'));
    assert!(len(b'c') <= len(b'd'));
    assert_eq!(tree.symbol_with_longest_code(), b'd');
    assert_eq!(tree.longest_code().len(), 3);

    let bits = tree.encode_with(text).unwrap();
    assert_eq!(tree.decode(&bits).unwrap(), text.as_bytes());
}
