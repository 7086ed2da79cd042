//! PDF→Graph adapter (C5): walks a parsed object tree into a [`LabeledGraph`].
//!
//! The root-resolution step is ordered after the object loop rather than
//! before it, unlike the textual order of the steps it implements: if the
//! resolved root id coincides with a real object's id, the object loop must
//! install that object's true attributes before anything inserts a bare
//! implicit vertex for the same label, or [`LabeledGraph`]'s first-wins rule
//! on duplicate labels would strand the object's attributes.

use std::collections::HashSet;

use crate::document::ParsedDocument;
use crate::graph::LabeledGraph;

const MISSING_ROOT: &str = "missing_root";

/// Build a [`LabeledGraph`] from a parsed document's object tree.
///
/// Deterministic and single-pass: does not dedupe edges itself (the graph
/// does). Duplicate `object` ids are tolerated by underscore-suffixing until
/// unique; refs whose target id never appears as an `object` get a
/// placeholder vertex tagged `missing_target`.
#[must_use]
pub fn adapt(doc: &ParsedDocument) -> LabeledGraph {
    let mut graph = LabeledGraph::new();
    graph.add_vertex("PDF", vec!["start".to_string()]);

    let root_id = match doc.root.find_tag("Root").and_then(|root| root.find_ref_id()) {
        Some(id) => id.to_string(),
        None => {
            graph.add_vertex(MISSING_ROOT, vec!["root".to_string()]);
            MISSING_ROOT.to_string()
        }
    };

    let mut visited: HashSet<String> = HashSet::new();
    let mut edges: Vec<(String, String)> = Vec::new();
    let mut referenced: Vec<String> = Vec::new();

    for object in doc.root.children().iter().filter(|node| node.tag() == "object") {
        let mut src_id = object.id().unwrap_or_default().to_string();
        while visited.contains(&src_id) {
            src_id.push('_');
        }
        visited.insert(src_id.clone());

        let tags = object.tags_preorder();
        graph.add_vertex(src_id.clone(), tags);

        for dst_id in object.ref_ids() {
            edges.push((src_id.clone(), dst_id.clone()));
            referenced.push(dst_id);
        }
    }

    let mut missing_targets_added: HashSet<String> = HashSet::new();
    for dst_id in &referenced {
        if !visited.contains(dst_id) && missing_targets_added.insert(dst_id.clone()) {
            graph.add_vertex(dst_id.clone(), vec!["missing_target".to_string()]);
        }
    }

    for (src, dst) in &edges {
        graph.add_edge(src, dst);
    }

    graph.add_edge("PDF", &root_id);

    graph
}
