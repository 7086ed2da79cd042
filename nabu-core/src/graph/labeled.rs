//! Dense, adjacency-matrix-backed labeled graph (C1).
//!
//! Association-graph densities reach `Θ(|V1|·|V2|)` vertices, so a dense
//! matrix keeps the inner `adjacent` probe used by the clique engine at O(1)
//! with predictable cache behaviour; a sparse representation would lose more
//! in clique enumeration than it saves on the build side.

use std::collections::HashMap;

/// A graph vertex: a dense index, a domain-opaque label, an attribute
/// multiset, and a weight used only by [`AssociationGraph`](crate::graph::AssociationGraph).
#[derive(Clone, Debug, PartialEq)]
pub struct Vertex {
    index: usize,
    label: String,
    attributes: Vec<String>,
    weight: f64,
}

impl Vertex {
    fn new(index: usize, label: String, attributes: Vec<String>) -> Self {
        Self {
            index,
            label,
            attributes,
            weight: 0.0,
        }
    }

    /// The vertex's dense zero-based index.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// The vertex's label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The vertex's attribute multiset, in insertion order.
    #[must_use]
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// The vertex's weight, in `[0, 1]`. Unused on base graphs.
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }

    pub(crate) fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }
}

/// An undirected graph with labeled, attributed vertices, backed by a dense
/// symmetric adjacency matrix.
#[derive(Clone, Debug, Default)]
pub struct LabeledGraph {
    vertices: Vec<Vertex>,
    index_of: HashMap<String, usize>,
    matrix: Vec<Vec<bool>>,
    edge_count: usize,
}

impl LabeledGraph {
    /// An empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk-load a graph from a vertex list and an edge list. Idempotent:
    /// calling this on an empty graph with the same input twice yields the
    /// same graph, since vertex labels are unique and edges dedupe.
    #[must_use]
    pub fn init(vertices: Vec<(String, Vec<String>)>, edges: Vec<(String, String)>) -> Self {
        let mut graph = Self::new();
        for (label, attrs) in vertices {
            graph.add_vertex(label, attrs);
        }
        for (u, v) in edges {
            graph.add_edge(&u, &v);
        }
        graph
    }

    /// Number of vertices.
    #[must_use]
    pub const fn order(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.edge_count
    }

    /// All vertices, in insertion order.
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// The vertex at `index`, if it exists.
    #[must_use]
    pub fn vertex(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    /// Enlarge the matrix by `n` rows and columns, filled with `false`. A
    /// no-op when `n` is 0.
    pub fn grow(&mut self, n: usize) {
        if n == 0 {
            return;
        }
        let new_order = self.matrix.len() + n;
        for row in &mut self.matrix {
            row.resize(new_order, false);
        }
        for _ in 0..n {
            self.matrix.push(vec![false; new_order]);
        }
    }

    /// Append a vertex and return its index. Never rejects a label:
    /// duplicate labels are the caller's responsibility (see
    /// [`Self::add_vertex`] for the first-wins tie-break actually applied).
    pub fn add_vertex(&mut self, label: impl Into<String>, attrs: Vec<String>) -> usize {
        let label = label.into();
        if let Some(&existing) = self.index_of.get(&label) {
            return existing;
        }
        let index = self.vertices.len();
        self.vertices.push(Vertex::new(index, label.clone(), attrs));
        self.index_of.insert(label, index);
        self.grow(1);
        index
    }

    /// Look up a vertex's index by label.
    #[must_use]
    pub fn vertex_by_label(&self, label: &str) -> Option<usize> {
        self.index_of.get(label).copied()
    }

    fn ensure_vertex(&mut self, label: &str) -> usize {
        if let Some(index) = self.vertex_by_label(label) {
            return index;
        }
        tracing::warn!(label, "edge endpoint missing, adding implicit vertex");
        self.add_vertex(label.to_string(), Vec::new())
    }

    /// Add an edge between two labels, implicitly creating either endpoint
    /// that does not already exist. Self-loops are rejected. Duplicate edges
    /// collapse (the edge count is unaffected by re-adding an existing edge).
    pub fn add_edge(&mut self, u_label: &str, v_label: &str) {
        let u = self.ensure_vertex(u_label);
        let v = self.ensure_vertex(v_label);
        if u == v {
            return;
        }
        if !self.matrix[u][v] {
            self.matrix[u][v] = true;
            self.matrix[v][u] = true;
            self.edge_count += 1;
        }
    }

    /// `1` if `u` and `v` are adjacent, `0` otherwise (including `u == v`).
    #[must_use]
    pub fn adjacent(&self, u_label: &str, v_label: &str) -> u8 {
        match (self.vertex_by_label(u_label), self.vertex_by_label(v_label)) {
            (Some(u), Some(v)) => u8::from(self.adjacent_index(u, v)),
            _ => 0,
        }
    }

    /// `true` if the vertices at `u` and `v` are adjacent; `false` if `u == v`.
    #[must_use]
    pub fn adjacent_index(&self, u: usize, v: usize) -> bool {
        if u == v {
            return false;
        }
        self.matrix
            .get(u)
            .and_then(|row| row.get(v))
            .copied()
            .unwrap_or(false)
    }

    /// Neighbor indices of `index`, in strictly ascending order.
    #[must_use]
    pub fn neighbors(&self, index: usize) -> Vec<usize> {
        self.matrix.get(index).map_or_else(Vec::new, |row| {
            row.iter()
                .enumerate()
                .filter_map(|(j, &adj)| adj.then_some(j))
                .collect()
        })
    }

    pub(crate) fn set_vertex_weight(&mut self, index: usize, weight: f64) {
        if let Some(vertex) = self.vertices.get_mut(index) {
            vertex.set_weight(weight);
        }
    }
}
