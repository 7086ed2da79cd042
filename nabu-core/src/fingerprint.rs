//! Glues the adapter (C5) and the NetSimile fingerprinter (C4) into a single
//! [`crate::store::FingerprintRecord`], ready for [`crate::store::FingerprintStore::put`].

use crate::adapter::adapt;
use crate::document::ParsedDocument;
use crate::error::{NabuError, Result};
use crate::graph::LabeledGraph;
use crate::netsimile::signature;
use crate::store::{FingerprintRecord, canonical_edges, canonical_vertices, digest};

fn edges_of(graph: &LabeledGraph) -> Vec<(String, String)> {
    let mut edges = Vec::new();
    for vertex in graph.vertices() {
        for neighbor_index in graph.neighbors(vertex.index()) {
            if neighbor_index <= vertex.index() {
                continue;
            }
            let Some(neighbor) = graph.vertex(neighbor_index) else {
                continue;
            };
            edges.push((vertex.label().to_string(), neighbor.label().to_string()));
        }
    }
    edges
}

/// Adapt `doc` into a graph, fingerprint it, and package the result as a
/// [`FingerprintRecord`] keyed by the document's id.
///
/// # Errors
/// Returns [`NabuError::Graph`] if the adapter produces an empty graph (the
/// GraphError case of §7: "adapter could not find a root, or produced an
/// empty graph"). In practice the adapter always seeds a `"PDF"` vertex, so
/// this only triggers defensively.
pub fn build_fingerprint(doc: &ParsedDocument) -> Result<FingerprintRecord> {
    let graph = adapt(doc);
    if graph.order() == 0 {
        return Err(NabuError::Graph {
            path: doc.path.clone(),
            message: "adapter produced an empty graph".to_string(),
        });
    }

    let vertices: Vec<(String, Vec<String>)> = graph
        .vertices()
        .iter()
        .map(|vertex| (vertex.label().to_string(), vertex.attributes().to_vec()))
        .collect();
    let edges = edges_of(&graph);
    let sig = signature(&graph);

    Ok(FingerprintRecord {
        document_id: doc.id.clone(),
        vertex_digest: digest(&canonical_vertices(&vertices)),
        edge_digest: digest(&canonical_edges(&edges)),
        vertices,
        edges,
        signature: sig,
    })
}
