//! NetSimile aggregation benchmarks.
//!
//! Measures the cost of extracting per-node features and aggregating them
//! into a 35-dimensional signature across graphs of increasing order.
#![allow(missing_docs, reason = "Criterion macros generate undocumented items")]
#![allow(
    clippy::shadow_reuse,
    reason = "Criterion bench_with_input closures rebind parameter names"
)]
#![allow(
    clippy::excessive_nesting,
    reason = "Criterion bench_with_input + b.iter pattern requires deep nesting"
)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use nabu_core::graph::LabeledGraph;
use nabu_core::netsimile::signature;

/// Graph orders to benchmark.
const VERTEX_COUNTS: &[usize] = &[50, 200, 800];

/// Build a path graph of `n` vertices, the simplest non-trivial topology
/// that exercises every feature in [`nabu_core::netsimile::node_features`].
fn path_graph(n: usize) -> LabeledGraph {
    let mut graph = LabeledGraph::new();
    for i in 0..n.saturating_sub(1) {
        graph.add_edge(&i.to_string(), &(i + 1).to_string());
    }
    graph
}

fn signature_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("netsimile_signature");

    for &n in VERTEX_COUNTS {
        let graph = path_graph(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &graph, |b, graph| {
            b.iter(|| signature(graph));
        });
    }

    group.finish();
}

criterion_group!(benches, signature_extraction);
criterion_main!(benches);
