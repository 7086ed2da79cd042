//! A deliberately simple lexical PDF object-tree extractor.
//!
//! Full PDF semantics (streams, filters, encryption, xref tables proper) are
//! out of scope; this parser only needs to recover the shape the adapter
//! (C5) consumes: `N 0 obj ... endobj` bodies, their `/Name` dictionary keys
//! as element tags, and `M 0 R` indirect references as `ref` children. This
//! mirrors the simplicity of the original tool's pdfminer-backed extractor,
//! which likewise discarded stream content and kept only the object graph.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::PdfParser;
use crate::document::{ObjectTreeNode, ParsedDocument};
use crate::error::{NabuError, Result};

static OBJECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[expect(clippy::expect_used, reason = "pattern is a fixed literal, checked at compile time via tests")]
    Regex::new(r"(?s)(\d+)\s+\d+\s+obj\b(.*?)endobj").expect("object pattern is valid")
});

static REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[expect(clippy::expect_used, reason = "pattern is a fixed literal, checked at compile time via tests")]
    Regex::new(r"(\d+)\s+\d+\s+R\b").expect("ref pattern is valid")
});

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[expect(clippy::expect_used, reason = "pattern is a fixed literal, checked at compile time via tests")]
    Regex::new(r"/([A-Za-z][A-Za-z0-9]*)").expect("name pattern is valid")
});

static TRAILER_ROOT_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[expect(clippy::expect_used, reason = "pattern is a fixed literal, checked at compile time via tests")]
    Regex::new(r"(?s)trailer.*?/Root\s+(\d+)\s+\d+\s+R").expect("trailer pattern is valid")
});

static CATALOG_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[expect(clippy::expect_used, reason = "pattern is a fixed literal, checked at compile time via tests")]
    Regex::new(r"/Type\s*/Catalog").expect("catalog pattern is valid")
});

/// Bytes are decoded one-to-one into `char`s (Latin-1 style) rather than as
/// UTF-8: PDF object bodies are not reliably valid UTF-8 and this parser only
/// cares about ASCII structural tokens (`obj`, `/Name`, `N 0 R`).
fn decode_lossy(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn element_children(body: &str) -> Vec<ObjectTreeNode> {
    let mut children = Vec::new();
    for name in NAME_RE.captures_iter(body) {
        if let Some(tag) = name.get(1) {
            children.push(ObjectTreeNode::element(tag.as_str(), Vec::new()));
        }
    }
    for reference in REF_RE.captures_iter(body) {
        if let Some(id) = reference.get(1) {
            children.push(ObjectTreeNode::reference(id.as_str()));
        }
    }
    children
}

fn find_root_id(text: &str, objects: &[(String, &str)]) -> Option<String> {
    let from_trailer = TRAILER_ROOT_RE
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str().to_string());
    from_trailer.or_else(|| {
        objects
            .iter()
            .find(|(_, body)| CATALOG_RE.is_match(body))
            .map(|(id, _)| id.clone())
    })
}

/// A simple lexical extractor named `"pdfminer"` in the `--parser` registry,
/// after the original tool's default.
#[derive(Debug, Default)]
pub struct NaivePdfParser;

impl NaivePdfParser {
    /// Construct the parser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PdfParser for NaivePdfParser {
    fn name(&self) -> &'static str {
        "pdfminer"
    }

    fn parse(&self, path: &Path) -> Result<ParsedDocument> {
        let bytes = fs::read(path).map_err(|source| NabuError::Parse {
            path: path.to_path_buf(),
            message: source.to_string(),
        })?;
        let text = decode_lossy(&bytes);

        let objects: Vec<(String, &str)> = OBJECT_RE
            .captures_iter(&text)
            .filter_map(|captures| {
                let id = captures.get(1)?.as_str().to_string();
                let body = captures.get(2)?.as_str();
                Some((id, body))
            })
            .collect();

        let mut errors = Vec::new();
        if objects.is_empty() {
            errors.push("no indirect objects recovered".to_string());
        }

        let mut children: Vec<ObjectTreeNode> = Vec::with_capacity(objects.len() + 1);
        if let Some(root_id) = find_root_id(&text, &objects) {
            children.push(ObjectTreeNode::element(
                "Root",
                vec![ObjectTreeNode::reference(root_id)],
            ));
        } else {
            errors.push("no document root found".to_string());
        }

        for (id, body) in &objects {
            children.push(ObjectTreeNode::object(id.clone(), element_children(body)));
        }

        Ok(ParsedDocument {
            id: ParsedDocument::id_for_path(path),
            path: path.to_path_buf(),
            root: ObjectTreeNode::element("pdf", children),
            errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::NaivePdfParser;
    use crate::parser::PdfParser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_pdf(body: &str) -> NamedTempFile {
        #[expect(clippy::unwrap_used, reason = "test fixture setup")]
        let mut file = NamedTempFile::new().unwrap();
        #[expect(clippy::unwrap_used, reason = "test fixture setup")]
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn recovers_objects_and_trailer_root() {
        let pdf = write_pdf(
            "1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n\
             2 0 obj\n<< /Type /Pages /Kids [3 0 R] >>\nendobj\n\
             trailer\n<< /Root 1 0 R >>\n",
        );
        #[expect(clippy::unwrap_used, reason = "assert-only test path")]
        let doc = NaivePdfParser::new().parse(pdf.path()).unwrap();
        let root = doc.root.find_tag("Root").unwrap();
        assert_eq!(root.find_ref_id(), Some("1"));
        let objects: Vec<&str> = doc
            .root
            .children()
            .iter()
            .filter(|node| node.tag() == "object")
            .filter_map(crate::document::ObjectTreeNode::id)
            .collect();
        assert_eq!(objects, vec!["1", "2"]);
    }

    #[test]
    fn falls_back_to_the_catalog_object_when_no_trailer_is_present() {
        let pdf = write_pdf("9 0 obj\n<< /Type /Catalog >>\nendobj\n");
        #[expect(clippy::unwrap_used, reason = "assert-only test path")]
        let doc = NaivePdfParser::new().parse(pdf.path()).unwrap();
        let root = doc.root.find_tag("Root").unwrap();
        assert_eq!(root.find_ref_id(), Some("9"));
    }

    #[test]
    fn empty_input_records_a_non_fatal_error() {
        let pdf = write_pdf("not a pdf at all");
        #[expect(clippy::unwrap_used, reason = "assert-only test path")]
        let doc = NaivePdfParser::new().parse(pdf.path()).unwrap();
        assert!(!doc.errors.is_empty());
    }
}
