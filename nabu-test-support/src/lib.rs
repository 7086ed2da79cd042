//! Shared test fixtures for nabu crates: a tiny object-tree builder DSL and
//! a handful of golden graphs matching the scenarios worked through in
//! nabu-core's design notes, so individual test modules don't hand-build
//! `ObjectTreeNode` trees or `LabeledGraph`s from scratch.

use nabu_core::document::{ObjectTreeNode, ParsedDocument};
use nabu_core::graph::LabeledGraph;
use std::path::PathBuf;

/// Build a minimal `ParsedDocument` wrapping `root`, with a synthetic id and
/// path derived from `name`.
#[must_use]
pub fn document(name: &str, root: ObjectTreeNode) -> ParsedDocument {
    ParsedDocument {
        id: name.to_string(),
        path: PathBuf::from(name),
        root,
        errors: Vec::new(),
    }
}

/// A trailer-rooted PDF with a catalog pointing at a two-object linear
/// chain: `Root -> 1 -> 2`.
#[must_use]
pub fn linear_chain_document(name: &str) -> ParsedDocument {
    let tree = ObjectTreeNode::element(
        "pdf",
        vec![
            ObjectTreeNode::element("Root", vec![ObjectTreeNode::reference("1")]),
            ObjectTreeNode::object(
                "1",
                vec![
                    ObjectTreeNode::element("Catalog", Vec::new()),
                    ObjectTreeNode::reference("2"),
                ],
            ),
            ObjectTreeNode::object("2", vec![ObjectTreeNode::element("Pages", Vec::new())]),
        ],
    );
    document(name, tree)
}

/// A three-vertex path graph `A - B - C`, attributes overlapping at `"a"`.
#[must_use]
pub fn path_graph_abc() -> LabeledGraph {
    LabeledGraph::init(
        vec![
            ("A".into(), vec!["a".into()]),
            ("B".into(), vec!["a".into(), "b".into()]),
            ("C".into(), vec!["a".into(), "c".into()]),
        ],
        vec![("A".into(), "B".into()), ("B".into(), "C".into())],
    )
}

/// A three-vertex complete graph (triangle) `X - Y - Z - X`, all attributed `"a"`.
#[must_use]
pub fn triangle_graph_xyz() -> LabeledGraph {
    LabeledGraph::init(
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
    )
}

#[cfg(test)]
mod tests {
    use super::{linear_chain_document, path_graph_abc, triangle_graph_xyz};

    #[test]
    fn linear_chain_document_has_a_resolvable_root() {
        let doc = linear_chain_document("sample.pdf");
        let root = doc.root.find_tag("Root").and_then(|node| node.find_ref_id());
        assert_eq!(root, Some("1"));
    }

    #[test]
    fn golden_graphs_have_the_expected_shape() {
        assert_eq!(path_graph_abc().order(), 3);
        assert_eq!(path_graph_abc().size(), 2);
        assert_eq!(triangle_graph_xyz().size(), 3);
    }
}
