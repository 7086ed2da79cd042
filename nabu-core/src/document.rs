//! The parsed-document handoff between a [`crate::parser::PdfParser`] and the
//! [`crate::adapter`] (C5): a well-typed replacement for the loose
//! (id, xml-tree) tuples the original tool passed around.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A single node of a parsed PDF's object tree: either a tagged element
/// (a dict, a list, an object, a literal, ...) or an indirect-reference leaf.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ObjectTreeNode {
    /// A tagged element, optionally carrying an `id` attribute (used by
    /// `object` nodes) and zero or more children.
    Element {
        /// Element tag, e.g. `"object"`, `"dict"`, `"Root"`.
        tag: String,
        /// The element's `id` attribute, if it has one.
        id: Option<String>,
        /// Child nodes, in document order.
        children: Vec<ObjectTreeNode>,
    },
    /// An indirect reference to another object, by id.
    Ref {
        /// The id of the referenced object.
        id: String,
    },
}

impl ObjectTreeNode {
    /// Construct a tagged element with no id and the given children.
    #[must_use]
    pub fn element(tag: impl Into<String>, children: Vec<Self>) -> Self {
        Self::Element {
            tag: tag.into(),
            id: None,
            children,
        }
    }

    /// Construct an `object` element carrying the given id.
    #[must_use]
    pub fn object(id: impl Into<String>, children: Vec<Self>) -> Self {
        Self::Element {
            tag: "object".to_string(),
            id: Some(id.into()),
            children,
        }
    }

    /// Construct a reference leaf.
    #[must_use]
    pub fn reference(id: impl Into<String>) -> Self {
        Self::Ref { id: id.into() }
    }

    /// This node's tag (`"ref"` for a reference leaf).
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Element { tag, .. } => tag,
            Self::Ref { .. } => "ref",
        }
    }

    /// This node's `id` attribute, if any.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Element { id, .. } => id.as_deref(),
            Self::Ref { id } => Some(id),
        }
    }

    /// This node's children (empty for a reference leaf).
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Element { children, .. } => children,
            Self::Ref { .. } => &[],
        }
    }

    /// Pre-order tags of this node and every descendant, i.e. the element
    /// tags found anywhere in this node's subtree, including itself.
    #[must_use]
    pub fn tags_preorder(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_tags(&mut out);
        out
    }

    fn collect_tags(&self, out: &mut Vec<String>) {
        out.push(self.tag().to_string());
        for child in self.children() {
            child.collect_tags(out);
        }
    }

    /// All `ref` descendants' ids, in document order, anywhere in this
    /// node's subtree (not including this node itself).
    #[must_use]
    pub fn ref_ids(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_refs(&mut out);
        out
    }

    fn collect_refs(&self, out: &mut Vec<String>) {
        for child in self.children() {
            if let Self::Ref { id } = child {
                out.push(id.clone());
            }
            child.collect_refs(out);
        }
    }

    /// Find the first descendant (including self) with the given tag,
    /// depth-first pre-order.
    #[must_use]
    pub fn find_tag(&self, tag: &str) -> Option<&Self> {
        if self.tag() == tag {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find_tag(tag))
    }

    /// Find the first `ref` descendant anywhere in this node's subtree
    /// (including this node).
    #[must_use]
    pub fn find_ref_id(&self) -> Option<&str> {
        if let Self::Ref { id } = self {
            return Some(id);
        }
        self.children().iter().find_map(Self::find_ref_id)
    }
}

/// The handoff type between a parser and the adapter: a parsed document's
/// identity plus its object tree and any non-fatal parse errors collected
/// along the way.
#[derive(Clone, Debug)]
pub struct ParsedDocument {
    /// A stable identifier for the document (derived from its path).
    pub id: String,
    /// The source path this document was parsed from.
    pub path: PathBuf,
    /// The root of the parsed object tree (tag `"pdf"`).
    pub root: ObjectTreeNode,
    /// Non-fatal parse errors or warnings collected while parsing.
    pub errors: Vec<String>,
}

impl ParsedDocument {
    /// Derive a document id from a path: its file name, or the full path if
    /// it has none.
    #[must_use]
    pub fn id_for_path(path: &Path) -> String {
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned())
    }
}
