//! The association (modular-product) graph (C3), derived from a pair of
//! [`LabeledGraph`]s, and its maximum-common-subgraph similarity scores.

use std::collections::HashSet;

use super::labeled::LabeledGraph;
use crate::clique::max_weight_clique;

/// Graph whose vertices are pairs `(a, b)` with `a ∈ V(G1)`, `b ∈ V(G2)`,
/// weighted by attribute-set Jaccard, with an edge between two pairs iff
/// their endpoints are distinct in both graphs and their adjacency agrees
/// (the standard modular-product construction for maximum common induced
/// subgraph detection).
#[derive(Clone, Debug)]
pub struct AssociationGraph {
    graph: LabeledGraph,
    /// `pairs[i]` is the `(g1_index, g2_index)` pair for association vertex `i`.
    pairs: Vec<(usize, usize)>,
    g1_order: usize,
    g2_order: usize,
}

/// Similarity scores derived from the maximum-weight clique of an
/// [`AssociationGraph`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimilarityScores {
    /// `|K*| / (order(G1) + order(G2) - |K*|)`.
    pub jaccard: f64,
    /// `weight(K*) / order(G1)`.
    pub weighted: f64,
}

fn jaccard_weight(a: &[String], b: &[String]) -> f64 {
    let a_set: HashSet<&str> = a.iter().map(String::as_str).collect();
    let b_set: HashSet<&str> = b.iter().map(String::as_str).collect();
    let union = a_set.union(&b_set).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a_set.intersection(&b_set).count();
    (intersection as f64) / (union as f64)
}

impl AssociationGraph {
    /// Build the association graph over `g1` and `g2`. Returns `None` if
    /// either input graph is empty, per the edge-case policy: the engine
    /// does not attempt to build an association graph from an empty input.
    #[must_use]
    pub fn build(g1: &LabeledGraph, g2: &LabeledGraph) -> Option<Self> {
        if g1.order() == 0 || g2.order() == 0 {
            return None;
        }

        let mut graph = LabeledGraph::new();
        let mut pairs = Vec::with_capacity(g1.order() * g2.order());

        for a in g1.vertices() {
            for b in g2.vertices() {
                let label = format!("{}:{}", a.index(), b.index());
                let weight = jaccard_weight(a.attributes(), b.attributes());
                let index = graph.add_vertex(label, Vec::new());
                graph.set_vertex_weight(index, weight);
                pairs.push((a.index(), b.index()));
            }
        }

        for i in 0..pairs.len() {
            let (a1, b1) = pairs[i];
            for j in (i + 1)..pairs.len() {
                let (a2, b2) = pairs[j];
                if a1 == a2 || b1 == b2 {
                    continue;
                }
                if g1.adjacent_index(a1, a2) == g2.adjacent_index(b1, b2) {
                    let label_i = format!("{a1}:{b1}");
                    let label_j = format!("{a2}:{b2}");
                    graph.add_edge(&label_i, &label_j);
                }
            }
        }

        Some(Self {
            graph,
            pairs,
            g1_order: g1.order(),
            g2_order: g2.order(),
        })
    }

    /// The underlying labeled graph of pair-vertices.
    #[must_use]
    pub const fn graph(&self) -> &LabeledGraph {
        &self.graph
    }

    /// The `(g1_index, g2_index)` pair behind association vertex `index`.
    #[must_use]
    pub fn pair(&self, index: usize) -> (usize, usize) {
        self.pairs[index]
    }

    /// Run the clique engine and derive the Jaccard and weighted similarity
    /// scores from the maximum-weight clique. Returns scores of `0.0` if no
    /// clique is found (an edgeless, vertexless association graph, which
    /// cannot occur given [`Self::build`]'s empty-input guard, but is
    /// handled defensively).
    #[must_use]
    pub fn similarity(&self) -> SimilarityScores {
        let Some(clique) = max_weight_clique(&self.graph) else {
            return SimilarityScores {
                jaccard: 0.0,
                weighted: 0.0,
            };
        };

        let distinct_g1: HashSet<usize> =
            clique.iter().map(|&index| self.pairs[index].0).collect();
        let clique_size = clique.len() as f64;
        let denom = (self.g1_order + self.g2_order) as f64 - clique_size;
        let jaccard = if denom <= 0.0 { 0.0 } else { clique_size / denom };

        let weight: f64 = clique
            .iter()
            .map(|&index| self.graph.vertex(index).map_or(0.0, super::Vertex::weight))
            .sum();
        let weighted = if self.g1_order == 0 {
            0.0
        } else {
            weight / (self.g1_order as f64)
        };

        debug_assert_eq!(distinct_g1.len(), clique.len());

        SimilarityScores { jaccard, weighted }
    }
}

#[cfg(test)]
mod tests {
    use super::AssociationGraph;
    use crate::graph::LabeledGraph;

    fn path_abc() -> LabeledGraph {
        LabeledGraph::init(
            vec![
                ("A".into(), vec!["a".into()]),
                ("B".into(), vec!["a".into(), "b".into()]),
                ("C".into(), vec!["a".into(), "c".into()]),
            ],
            vec![("A".into(), "B".into()), ("B".into(), "C".into())],
        )
    }

    #[test]
    fn self_similarity_is_one() {
        let g = path_abc();
        let assoc = AssociationGraph::build(&g, &g).unwrap();
        let scores = assoc.similarity();
        assert!((scores.jaccard - 1.0).abs() < 1e-9);
        assert!((scores.weighted - 1.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_attributes_give_zero_weighted_score() {
        let g1 = path_abc();
        let g2 = LabeledGraph::init(
            vec![
                ("X".into(), vec!["x".into()]),
                ("Y".into(), vec!["y".into()]),
                ("Z".into(), vec!["z".into()]),
            ],
            vec![("X".into(), "Y".into()), ("Y".into(), "Z".into())],
        );
        let assoc = AssociationGraph::build(&g1, &g2).unwrap();
        let scores = assoc.similarity();
        assert_eq!(scores.weighted, 0.0);
        assert!(scores.jaccard <= 1.0);
    }

    #[test]
    fn path_vs_triangle_finds_the_largest_consistent_mapping() {
        // G2 is a complete graph, so the XNOR compatibility rule reduces to
        // "a1 and a2 must be adjacent in G1" (g2 is always adjacent for
        // distinct b's). G1's biggest clique is size 2 (it is a path), so
        // the largest consistent pair-mapping has size 2, not 3: the path's
        // single non-adjacency (A-C) has no counterpart to match against in
        // a complete triangle.
        let g1 = path_abc();
        let g2 = LabeledGraph::init(
            vec![
                ("X".into(), vec!["a".into()]),
                ("Y".into(), vec!["a".into()]),
                ("Z".into(), vec!["a".into()]),
            ],
            vec![
                ("X".into(), "Y".into()),
                ("Y".into(), "Z".into()),
                ("X".into(), "Z".into()),
            ],
        );
        let assoc = AssociationGraph::build(&g1, &g2).unwrap();
        let scores = assoc.similarity();
        assert!((scores.jaccard - 0.5).abs() < 1e-9);
    }

    #[test]
    fn empty_graph_builds_no_association() {
        let empty = LabeledGraph::new();
        let g = path_abc();
        assert!(AssociationGraph::build(&empty, &g).is_none());
    }
}
