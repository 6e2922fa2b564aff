use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use search_trees::{BalancedMap, CodeTree, Degree, MultiwayTree, PrefixTrie, RotatingOrderedSet};

#[derive(Clone)]
enum TreeEnum {
    Balanced(BalancedMap<i32, i32>),
    Rotating(RotatingOrderedSet<i32, i32>),
    Multiway(MultiwayTree<i32>),
}

impl TreeEnum {
    fn find(&self, k: &i32) -> bool {
        match self {
            Self::Balanced(t) => t.contains_key(k),
            Self::Rotating(t) => t.contains(k),
            Self::Multiway(t) => t.contains(k),
        }
    }

    fn insert(&mut self, k: i32) {
        match self {
            Self::Balanced(t) => {
                t.put(k, k);
            }
            Self::Rotating(t) => {
                t.put(k, k);
            }
            Self::Multiway(t) => {
                t.insert(k);
            }
        }
    }

    /// The B-tree has no delete, so it sits the delete groups out.
    fn delete(&mut self, k: &i32) -> bool {
        match self {
            Self::Balanced(t) => t.remove(k).is_some(),
            Self::Rotating(t) => t.delete(k).is_some(),
            Self::Multiway(_) => false,
        }
    }

    fn supports_delete(&self) -> bool {
        !matches!(self, Self::Multiway(_))
    }
}

/// Helper to bench a function on each tree.
/// It creates a group for the given name and closure and runs tests for various sizes and
/// implementations before finishing the group.
fn bench_helper(
    c: &mut Criterion,
    name: &str,
    deletes: bool,
    f: impl Fn(&mut TreeEnum, i32),
) {
    let mut group = c.benchmark_group(name);

    for num_levels in [3, 7, 11, 15] {
        let num_nodes = 2i32.pow(num_levels) - 1;
        let largest_element_in_tree = num_nodes - 1;

        let balanced: BalancedMap<_, _> = (0..num_nodes).map(|x| (x, x)).collect();
        // Ascending puts would leave this one a linked list, so build it balanced.
        let rotating = RotatingOrderedSet::from_sorted((0..num_nodes).map(|x| (x, x)))
            .expect("keys are ascending");
        let multiway = {
            let mut tree = MultiwayTree::with_degree(Degree::new(8).expect("8 is a valid degree"));
            tree.extend(0..num_nodes);
            tree
        };

        let tree_tests = [
            ("balanced", TreeEnum::Balanced(balanced)),
            ("rotating", TreeEnum::Rotating(rotating)),
            ("multiway", TreeEnum::Multiway(multiway)),
        ];
        for (name, tree) in tree_tests {
            if deletes && !tree.supports_delete() {
                continue;
            }
            let id = BenchmarkId::new(name, largest_element_in_tree);

            group.bench_function(id, |b| {
                b.iter_custom(|iters| {
                    let mut time = std::time::Duration::ZERO;
                    for _ in 0..iters {
                        let mut tree = black_box(tree.clone());
                        let instant = std::time::Instant::now();
                        f(&mut tree, black_box(largest_element_in_tree));
                        let elapsed = instant.elapsed();
                        time += elapsed;
                    }
                    time
                })
            });
        }
    }

    group.finish();
}

fn bench_trie(c: &mut Criterion) {
    let words: Vec<String> = (0..4096u32)
        .map(|i| format!("{:x}-{}", i.wrapping_mul(2654435761), i))
        .collect();
    let trie: PrefixTrie<usize> = words.iter().enumerate().map(|(i, w)| (w, i)).collect();

    let mut group = c.benchmark_group("trie");
    group.bench_function("get", |b| {
        b.iter(|| black_box(trie.get(black_box(&words[2048]))))
    });
    group.bench_function("count-prefix", |b| {
        b.iter(|| black_box(trie.count_all_keys_with_prefix(black_box("a"))))
    });
    group.finish();
}

fn bench_huffman(c: &mut Criterion) {
    let text = "it was the best of times, it was the worst of times, ".repeat(64);

    let mut group = c.benchmark_group("huffman");
    group.bench_function("build", |b| b.iter(|| CodeTree::build(black_box(&text))));
    let encoded = CodeTree::encode(&text).expect("text is not empty");
    group.bench_function("decode", |b| {
        b.iter(|| encoded.tree.decode(black_box(&encoded.bits)))
    });
    group.finish();
}

pub fn criterion_benchmark(c: &mut Criterion) {
    bench_helper(c, "find", false, |tree, i| {
        let _found = black_box(tree.find(&i));
    });
    bench_helper(c, "delete", true, |tree, i| {
        tree.delete(&i);
    });

    bench_helper(c, "insert", false, |tree, i| {
        tree.insert(i + 1);
    });

    bench_helper(c, "find-miss", false, |tree, i| {
        let _found = black_box(tree.find(&(i + 1)));
    });
    bench_helper(c, "delete-miss", true, |tree, i| {
        tree.delete(&(i + 1));
    });

    bench_trie(c);
    bench_huffman(c);
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
