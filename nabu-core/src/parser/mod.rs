//! Parser selection (`--parser NAME`): a named-registry indirection in the
//! spirit of the original tool's `PARSER_FACTORY_FUNCS`, expressed as a trait
//! plus a small lookup function instead of a dict of factory closures.

mod naive;

use std::path::Path;

use crate::document::ParsedDocument;
use crate::error::{NabuError, Result};

/// Produces a [`ParsedDocument`] from a PDF on disk.
pub trait PdfParser: Send + Sync {
    /// The parser's registry name, as accepted by `--parser`.
    fn name(&self) -> &'static str;

    /// Parse the PDF at `path` into its object tree.
    ///
    /// # Errors
    /// Returns [`NabuError::Parse`] if the file cannot be read or its
    /// object tree cannot be extracted.
    fn parse(&self, path: &Path) -> Result<ParsedDocument>;
}

/// Look up a parser by its `--parser` name.
///
/// `"pdfminer"` resolves to [`naive::NaivePdfParser`], a deliberately simple
/// lexical object-tree extractor (full PDF semantics are out of scope).
/// `"peepdf"` is reserved and unimplemented, mirroring the original tool's
/// `get_peepdf` stub; selecting it is a fatal input error, exactly as
/// selecting an unknown name is.
///
/// # Errors
/// Returns [`NabuError::Input`] if `name` does not name a usable parser.
pub fn get_parser(name: &str) -> Result<Box<dyn PdfParser>> {
    match name {
        "pdfminer" => Ok(Box::new(naive::NaivePdfParser::new())),
        "peepdf" => Err(NabuError::Input {
            message: "parser `peepdf` is not implemented".to_string(),
        }),
        other => Err(NabuError::Input {
            message: format!("unknown parser `{other}`"),
        }),
    }
}
