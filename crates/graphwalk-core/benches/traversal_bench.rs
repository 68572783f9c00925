//! Traversal benchmarks.
//!
//! ```bash
//! cargo bench -p graphwalk-core
//! ```

use std::hint::black_box;
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use graphwalk_common::types::DocumentHandle;
use graphwalk_core::{
    Direction, Edge, GraphStore, MemoryStore, Strategy, TraversalOptions, Traverser, Uniqueness,
    Vertex,
};

/// Builds a graph where vertex `i` links to `i*k+1 ..= i*k+k` (a k-ary tree)
/// plus one back edge per vertex to keep cycles in play.
fn tree_with_back_edges(size: usize, fanout: usize) -> MemoryStore {
    let store = MemoryStore::new();
    let handle = |i: usize| DocumentHandle::new("Node", &i.to_string()).unwrap();

    for i in 0..size {
        store.put_vertex(Vertex::new(handle(i)).with_property("n", i as i64)).unwrap();
    }
    let mut edge_id = 0usize;
    let mut edge = |from: usize, to: usize| {
        let id = DocumentHandle::new("Link", &edge_id.to_string()).unwrap();
        edge_id += 1;
        store.put_edge(Edge::new(id, handle(from), handle(to))).unwrap();
    };
    for i in 0..size {
        for c in 1..=fanout {
            let child = i * fanout + c;
            if child < size {
                edge(i, child);
            }
        }
        if i > 0 {
            edge(i, i / 2);
        }
    }
    store
}

// =============================================================================
// Full traversals
// =============================================================================

fn bench_full_traversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_traversal");
    group.warm_up_time(Duration::from_millis(200));
    group.measurement_time(Duration::from_secs(2));

    for size in [1_000, 10_000] {
        let store = tree_with_back_edges(size, 4);
        let start = DocumentHandle::parse("Node/0").unwrap();
        group.throughput(Throughput::Elements(size as u64));

        for (name, strategy) in [
            ("bfs", Strategy::BreadthFirst),
            ("dfs", Strategy::DepthFirst),
        ] {
            let opts = TraversalOptions::new().with_strategy(strategy);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    let snapshot = store.snapshot();
                    let result = Traverser::new(&snapshot, opts.clone()).run(&start).unwrap();
                    black_box(result.visited.vertices.len());
                });
            });
        }
    }

    group.finish();
}

// =============================================================================
// Bounded traversals
// =============================================================================

fn bench_bounded_any(c: &mut Criterion) {
    let mut group = c.benchmark_group("bounded_any");
    let store = tree_with_back_edges(10_000, 4);
    let start = DocumentHandle::parse("Node/0").unwrap();

    for depth in [2, 4, 6] {
        let opts = TraversalOptions::new()
            .with_direction(Direction::Any)
            .with_max_depth(depth);
        group.bench_with_input(BenchmarkId::new("global", depth), &depth, |b, _| {
            b.iter(|| {
                let snapshot = store.snapshot();
                black_box(Traverser::new(&snapshot, opts.clone()).run(&start).unwrap());
            });
        });
    }

    let opts = TraversalOptions::new()
        .with_uniqueness(Uniqueness::Path)
        .with_max_depth(4);
    group.bench_function("path_depth_4", |b| {
        b.iter(|| {
            let snapshot = store.snapshot();
            black_box(Traverser::new(&snapshot, opts.clone()).run(&start).unwrap());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_full_traversal, bench_bounded_any);
criterion_main!(benches);
