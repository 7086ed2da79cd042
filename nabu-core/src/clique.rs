//! The clique engine (C2): pivoted Bron–Kerbosch over a degeneracy ordering.
//!
//! The degeneracy-ordered outer loop bounds worst-case work at `3^(d/3)`
//! where `d` is the graph's degeneracy, which is why it is the variant
//! shipped rather than the plain recursive form (kept here too, as the
//! primitive the degeneracy loop calls into).

use std::collections::BTreeSet;

use crate::graph::LabeledGraph;

type VertexSet = BTreeSet<usize>;

fn neighbor_set(graph: &LabeledGraph, v: usize) -> VertexSet {
    graph.neighbors(v).into_iter().collect()
}

/// Pick the pivot in `p ∪ x` maximizing `|N(u) ∩ p|`, breaking ties by
/// smallest index so the algorithm is deterministic across runs.
fn choose_pivot(graph: &LabeledGraph, p: &VertexSet, x: &VertexSet) -> Option<usize> {
    p.union(x)
        .map(|&u| {
            let n_u = neighbor_set(graph, u);
            let overlap = n_u.intersection(p).count();
            (overlap, u)
        })
        .max_by(|(a_overlap, a_u), (b_overlap, b_u)| {
            a_overlap
                .cmp(b_overlap)
                .then_with(|| b_u.cmp(a_u))
        })
        .map(|(_, u)| u)
}

fn bron_kerbosch(
    graph: &LabeledGraph,
    r: &mut Vec<usize>,
    mut p: VertexSet,
    mut x: VertexSet,
    cliques: &mut Vec<Vec<usize>>,
) {
    if p.is_empty() && x.is_empty() {
        cliques.push(r.clone());
        return;
    }

    let Some(pivot) = choose_pivot(graph, &p, &x) else {
        return;
    };
    let n_pivot = neighbor_set(graph, pivot);
    let candidates: Vec<usize> = p.difference(&n_pivot).copied().collect();

    for v in candidates {
        let n_v = neighbor_set(graph, v);
        r.push(v);
        let next_p: VertexSet = p.intersection(&n_v).copied().collect();
        let next_x: VertexSet = x.intersection(&n_v).copied().collect();
        bron_kerbosch(graph, r, next_p, next_x, cliques);
        r.pop();
        p.remove(&v);
        x.insert(v);
    }
}

/// Enumerate all maximal cliques using the plain pivoted recursion, with no
/// outer ordering. Used directly by [`maximal_cliques`] on small graphs and
/// exercised on its own in tests.
#[must_use]
pub fn maximal_cliques_pivot_only(graph: &LabeledGraph) -> Vec<Vec<usize>> {
    let all: VertexSet = (0..graph.order()).collect();
    let mut cliques = Vec::new();
    bron_kerbosch(graph, &mut Vec::new(), all, VertexSet::new(), &mut cliques);
    cliques
}

/// A degeneracy ordering of `graph`'s vertices: repeatedly remove a vertex of
/// minimum current degree, recording removal order.
fn degeneracy_ordering(graph: &LabeledGraph) -> Vec<usize> {
    let n = graph.order();
    let mut remaining: VertexSet = (0..n).collect();
    let mut degree: Vec<usize> = (0..n).map(|v| graph.neighbors(v).len()).collect();
    let mut order = Vec::with_capacity(n);

    while !remaining.is_empty() {
        #[expect(clippy::expect_used, reason = "loop guard ensures remaining is non-empty")]
        let next = remaining
            .iter()
            .copied()
            .min_by_key(|&v| (degree[v], v))
            .expect("remaining is non-empty");
        remaining.remove(&next);
        order.push(next);
        for neighbor in graph.neighbors(next) {
            if remaining.contains(&neighbor) {
                degree[neighbor] = degree[neighbor].saturating_sub(1);
            }
        }
    }
    order
}

/// Enumerate all maximal cliques of `graph` using pivoted Bron–Kerbosch over
/// a degeneracy ordering.
#[must_use]
pub fn maximal_cliques(graph: &LabeledGraph) -> Vec<Vec<usize>> {
    let order = degeneracy_ordering(graph);
    let position: Vec<usize> = {
        let mut position = vec![0usize; order.len()];
        for (rank, &v) in order.iter().enumerate() {
            position[v] = rank;
        }
        position
    };

    let mut cliques = Vec::new();
    for &v in &order {
        let neighbors = neighbor_set(graph, v);
        let earlier: VertexSet = neighbors
            .iter()
            .copied()
            .filter(|&u| position[u] < position[v])
            .collect();
        let later: VertexSet = neighbors
            .iter()
            .copied()
            .filter(|&u| position[u] > position[v])
            .collect();
        let mut r = vec![v];
        bron_kerbosch(graph, &mut r, later, earlier, &mut cliques);
    }
    cliques
}

fn clique_weight(graph: &LabeledGraph, clique: &[usize]) -> f64 {
    clique
        .iter()
        .map(|&v| graph.vertex(v).map_or(0.0, crate::graph::Vertex::weight))
        .sum()
}

/// The maximal clique with the greatest total vertex weight. Ties are broken
/// deterministically: larger clique first, then lexicographically smallest
/// sorted index vector.
#[must_use]
pub fn max_weight_clique(graph: &LabeledGraph) -> Option<Vec<usize>> {
    let mut cliques = maximal_cliques(graph);
    if cliques.is_empty() {
        return None;
    }
    for clique in &mut cliques {
        clique.sort_unstable();
    }
    cliques.into_iter().max_by(|a, b| {
        let weight_a = clique_weight(graph, a);
        let weight_b = clique_weight(graph, b);
        weight_a
            .partial_cmp(&weight_b)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.len().cmp(&b.len()))
            .then_with(|| b.cmp(a))
    })
}

#[cfg(test)]
mod tests {
    use super::{maximal_cliques, maximal_cliques_pivot_only};
    use crate::graph::LabeledGraph;

    fn triangle_plus_pendant() -> LabeledGraph {
        // 0-1-2 triangle, plus a pendant vertex 3 attached to 0.
        let mut g = LabeledGraph::new();
        g.add_edge("0", "1");
        g.add_edge("1", "2");
        g.add_edge("0", "2");
        g.add_edge("0", "3");
        g
    }

    fn is_clique(graph: &LabeledGraph, members: &[usize]) -> bool {
        members.iter().all(|&a| {
            members
                .iter()
                .all(|&b| a == b || graph.adjacent_index(a, b))
        })
    }

    fn is_maximal(graph: &LabeledGraph, members: &[usize]) -> bool {
        (0..graph.order())
            .filter(|v| !members.contains(v))
            .all(|v| !members.iter().all(|&m| graph.adjacent_index(v, m)))
    }

    #[test]
    fn every_returned_clique_is_maximal_and_duplicate_free() {
        let g = triangle_plus_pendant();
        let cliques = maximal_cliques(&g);
        assert!(!cliques.is_empty());
        for clique in &cliques {
            assert!(is_clique(&g, clique));
            assert!(is_maximal(&g, clique));
        }
        let mut sorted: Vec<Vec<usize>> = cliques
            .iter()
            .map(|c| {
                let mut c = c.clone();
                c.sort_unstable();
                c
            })
            .collect();
        sorted.sort();
        let before = sorted.len();
        sorted.dedup();
        assert_eq!(sorted.len(), before);
    }

    #[test]
    fn degeneracy_and_plain_pivot_agree_on_the_clique_set() {
        let g = triangle_plus_pendant();
        let mut a: Vec<Vec<usize>> = maximal_cliques(&g)
            .into_iter()
            .map(|mut c| {
                c.sort_unstable();
                c
            })
            .collect();
        let mut b: Vec<Vec<usize>> = maximal_cliques_pivot_only(&g)
            .into_iter()
            .map(|mut c| {
                c.sort_unstable();
                c
            })
            .collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn deterministic_across_repeated_runs() {
        let g = triangle_plus_pendant();
        let first = maximal_cliques(&g);
        let second = maximal_cliques(&g);
        assert_eq!(first, second);
    }

    fn graph_from_edges(vertex_count: usize, edges: &[(usize, usize)]) -> LabeledGraph {
        let mut g = LabeledGraph::new();
        for v in 0..vertex_count {
            g.add_vertex(v.to_string(), Vec::new());
        }
        for &(a, b) in edges {
            if a != b {
                g.add_edge(&a.to_string(), &b.to_string());
            }
        }
        g
    }

    proptest::proptest! {
        #[test]
        fn random_small_graphs_yield_only_maximal_duplicate_free_cliques(
            vertex_count in 1_usize..9,
            raw_edges in proptest::collection::vec((0_usize..9, 0_usize..9), 0..20),
        ) {
            let edges: Vec<(usize, usize)> = raw_edges
                .into_iter()
                .filter(|&(a, b)| a < vertex_count && b < vertex_count)
                .collect();
            let g = graph_from_edges(vertex_count, &edges);
            let cliques = maximal_cliques(&g);

            for clique in &cliques {
                proptest::prop_assert!(is_clique(&g, clique));
                proptest::prop_assert!(is_maximal(&g, clique));
            }

            let mut sorted: Vec<Vec<usize>> = cliques
                .iter()
                .map(|c| {
                    let mut c = c.clone();
                    c.sort_unstable();
                    c
                })
                .collect();
            sorted.sort();
            let before = sorted.len();
            sorted.dedup();
            proptest::prop_assert_eq!(sorted.len(), before);
        }

        #[test]
        fn random_small_graphs_are_deterministic_across_repeated_runs(
            vertex_count in 1_usize..9,
            raw_edges in proptest::collection::vec((0_usize..9, 0_usize..9), 0..20),
        ) {
            let edges: Vec<(usize, usize)> = raw_edges
                .into_iter()
                .filter(|&(a, b)| a < vertex_count && b < vertex_count)
                .collect();
            let g = graph_from_edges(vertex_count, &edges);
            let first = maximal_cliques(&g);
            let second = maximal_cliques(&g);
            proptest::prop_assert_eq!(first, second);
        }
    }
}
