//! NetSimile-style graph fingerprinting (C4): seven per-node features
//! aggregated by five statistical moments into a 35-dimensional signature,
//! compared with Canberra distance.

use crate::graph::LabeledGraph;

/// Number of per-node features extracted by [`node_features`].
pub const NUM_FEATURES: usize = 7;
/// Number of statistical moments aggregated per feature.
pub const NUM_MOMENTS: usize = 5;
/// Length of a full signature (`NUM_FEATURES * NUM_MOMENTS`).
pub const SIGNATURE_LEN: usize = NUM_FEATURES * NUM_MOMENTS;

fn clustering_coefficient(graph: &LabeledGraph, v: usize) -> f64 {
    let neighbors = graph.neighbors(v);
    let k = neighbors.len();
    if k < 2 {
        return 0.0;
    }
    let mut links = 0usize;
    for i in 0..k {
        for j in (i + 1)..k {
            if graph.adjacent_index(neighbors[i], neighbors[j]) {
                links += 1;
            }
        }
    }
    let k = k as f64;
    (2.0 * links as f64) / (k * (k - 1.0))
}

struct EgoStats {
    edges_in: usize,
    edges_out: usize,
    external_neighbors: usize,
}

fn ego_stats(graph: &LabeledGraph, v: usize) -> EgoStats {
    use std::collections::HashSet;

    let neighbors = graph.neighbors(v);
    let ego: HashSet<usize> = neighbors.iter().copied().chain([v]).collect();
    let members: Vec<usize> = std::iter::once(v).chain(neighbors.iter().copied()).collect();

    let mut edges_in = 0usize;
    let mut edges_out = 0usize;
    let mut external = HashSet::new();

    for &m in &members {
        for n in graph.neighbors(m) {
            if ego.contains(&n) {
                if n > m {
                    edges_in += 1;
                }
            } else {
                edges_out += 1;
                external.insert(n);
            }
        }
    }

    EgoStats {
        edges_in,
        edges_out,
        external_neighbors: external.len(),
    }
}

/// Compute the seven NetSimile features of vertex `v`:
/// degree, clustering coefficient, mean neighbor degree, mean neighbor
/// clustering coefficient, egonet edge count, egonet outgoing edges, and
/// egonet external-neighbor count.
#[must_use]
pub fn node_features(graph: &LabeledGraph, v: usize) -> [f64; NUM_FEATURES] {
    let neighbors = graph.neighbors(v);
    let degree = neighbors.len();
    let c_v = clustering_coefficient(graph, v);

    let (mean_neighbor_degree, mean_neighbor_clustering) = if degree == 0 {
        (0.0, 0.0)
    } else {
        let degree_sum: usize = neighbors.iter().map(|&u| graph.neighbors(u).len()).sum();
        let clustering_sum: f64 = neighbors
            .iter()
            .map(|&u| clustering_coefficient(graph, u))
            .sum();
        (
            degree_sum as f64 / degree as f64,
            clustering_sum / degree as f64,
        )
    };

    let ego = ego_stats(graph, v);

    [
        degree as f64,
        c_v,
        mean_neighbor_degree,
        mean_neighbor_clustering,
        ego.edges_in as f64,
        ego.edges_out as f64,
        ego.external_neighbors as f64,
    ]
}

fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Aggregate a feature column into `[median, mean, stddev, skewness,
/// kurtosis]`. A zero-variance column (including an all-zero column)
/// contributes `0.0` for both skewness and kurtosis rather than `NaN`.
#[must_use]
pub fn aggregate_column(values: &[f64]) -> [f64; NUM_MOMENTS] {
    let n = values.len();
    if n == 0 {
        return [0.0; NUM_MOMENTS];
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let med = median(&sorted);

    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
    let stddev = variance.sqrt();

    let (skewness, kurtosis) = if stddev <= f64::EPSILON {
        (0.0, 0.0)
    } else {
        let m3 = values.iter().map(|x| (x - mean).powi(3)).sum::<f64>() / n as f64;
        let m4 = values.iter().map(|x| (x - mean).powi(4)).sum::<f64>() / n as f64;
        (m3 / stddev.powi(3), m4 / stddev.powi(4) - 3.0)
    };

    [med, mean, stddev, skewness, kurtosis]
}

/// The 35-dimensional NetSimile signature of `graph`: five moments per
/// feature, in the fixed feature order of [`node_features`]. Returns a
/// zeroed signature for an empty graph.
#[must_use]
pub fn signature(graph: &LabeledGraph) -> Vec<f64> {
    if graph.order() == 0 {
        return vec![0.0; SIGNATURE_LEN];
    }

    let matrix: Vec<[f64; NUM_FEATURES]> =
        (0..graph.order()).map(|v| node_features(graph, v)).collect();

    let mut sig = Vec::with_capacity(SIGNATURE_LEN);
    for feature in 0..NUM_FEATURES {
        let column: Vec<f64> = matrix.iter().map(|row| row[feature]).collect();
        sig.extend_from_slice(&aggregate_column(&column));
    }
    sig
}

/// Canberra distance between two equal-length signatures: `Σ |xi - yi| /
/// (|xi| + |yi|)`, with terms where both numerator and denominator are zero
/// contributing zero.
#[must_use]
pub fn canberra_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let denom = x.abs() + y.abs();
            if denom <= f64::EPSILON {
                0.0
            } else {
                (x - y).abs() / denom
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::{canberra_distance, signature, SIGNATURE_LEN};
    use crate::graph::LabeledGraph;

    fn path_abc() -> LabeledGraph {
        LabeledGraph::init(
            vec![
                ("A".into(), vec![]),
                ("B".into(), vec![]),
                ("C".into(), vec![]),
            ],
            vec![("A".into(), "B".into()), ("B".into(), "C".into())],
        )
    }

    #[test]
    fn signature_has_fixed_length() {
        let g = path_abc();
        assert_eq!(signature(&g).len(), SIGNATURE_LEN);
    }

    #[test]
    fn canberra_distance_is_zero_for_identical_signatures() {
        let sig = signature(&path_abc());
        assert_eq!(canberra_distance(&sig, &sig), 0.0);
    }

    #[test]
    fn canberra_distance_sanity_values() {
        let mut a = vec![0.0; SIGNATURE_LEN];
        let mut b = vec![0.0; SIGNATURE_LEN];
        a[0] = 1.0;
        b[0] = 1.0;
        a[1] = 2.0;
        b[1] = 2.0;
        a[2] = 3.0;
        b[2] = 3.0;
        assert_eq!(canberra_distance(&a, &b), 0.0);

        let mut c = vec![0.0; SIGNATURE_LEN];
        let mut d = vec![0.0; SIGNATURE_LEN];
        c[0] = 1.0;
        d[1] = 1.0;
        assert_eq!(canberra_distance(&c, &d), 2.0);
    }
}
