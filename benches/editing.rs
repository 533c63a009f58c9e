//! Benchmarks for offset-addressed editing.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use stringtree::tree::{Flags, Node, StringTree};

fn sample_tree(segments: usize) -> StringTree {
    let mut node = Node::plain();
    for i in 0..segments {
        node = node
            .with_text(format!("segment {i} "))
            .with_child(Node::text(format!("{{var{i}}}")).with_flags(Flags::locked()));
    }
    StringTree::build(node).unwrap()
}

fn bench_insert_middle(c: &mut Criterion) {
    let tree = sample_tree(50);
    let middle = tree.len() / 2;
    c.bench_function("insert_middle", |b| {
        b.iter(|| {
            let mut tree = tree.clone();
            let _ = tree.insert(black_box(middle), black_box("x"));
            tree
        })
    });
}

fn bench_delete_span(c: &mut Criterion) {
    let tree = sample_tree(50);
    let len = tree.len();
    c.bench_function("delete_span", |b| {
        b.iter(|| {
            let mut tree = tree.clone();
            tree.delete_range(black_box(3), black_box(len - 3)).unwrap()
        })
    });
}

fn bench_prune(c: &mut Criterion) {
    let tree = StringTree::build(
        (0..50).fold(Node::plain(), |node, i| {
            node.with_child(Node::plain().with_child(Node::text(format!("run {i}"))))
        }),
    )
    .unwrap();
    c.bench_function("prune_nested", |b| {
        b.iter(|| {
            let mut tree = tree.clone();
            tree.prune();
            tree
        })
    });
}

criterion_group!(benches, bench_insert_middle, bench_delete_span, bench_prune);
criterion_main!(benches);
