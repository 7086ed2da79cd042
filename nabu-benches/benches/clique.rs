//! Clique-engine benchmarks.
//!
//! Measures maximal-clique enumeration over synthetic dense graphs of
//! increasing order, the regime [`nabu_core::graph::LabeledGraph`]'s dense
//! adjacency matrix is designed for.
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

use nabu_core::clique::maximal_cliques;
use nabu_core::graph::LabeledGraph;

/// Graph orders to benchmark.
const VERTEX_COUNTS: &[usize] = &[20, 40, 80];

/// Build a cyclic graph of `n` vertices, each also connected to the vertex
/// two steps away, giving every vertex degree 4 and a non-trivial clique
/// structure (each adjacent triple closes a triangle) without being complete.
fn synthetic_graph(n: usize) -> LabeledGraph {
    let mut graph = LabeledGraph::new();
    for i in 0..n {
        let next = (i + 1) % n;
        let skip = (i + 2) % n;
        graph.add_edge(&i.to_string(), &next.to_string());
        graph.add_edge(&i.to_string(), &skip.to_string());
    }
    graph
}

fn clique_enumeration(c: &mut Criterion) {
    let mut group = c.benchmark_group("maximal_cliques");

    for &n in VERTEX_COUNTS {
        let graph = synthetic_graph(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &graph, |b, graph| {
            b.iter(|| maximal_cliques(graph));
        });
    }

    group.finish();
}

criterion_group!(benches, clique_enumeration);
criterion_main!(benches);
