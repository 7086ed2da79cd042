//! Structural PDF fingerprinting and maximum-common-subgraph similarity.
//!
//! `nabu-core` turns a PDF's object tree into a labeled graph ([`adapter`]),
//! fingerprints it with NetSimile statistics ([`netsimile`]), persists
//! fingerprints in a SQLite-backed store ([`store`]) keyed by structural
//! family, and compares two documents' graphs via a clique-engine
//! approximation of maximum common induced subgraph ([`clique`],
//! [`graph`]). [`driver`] wires these pieces into the parallel `build` and
//! `score` actions driven by `nabu-cli`.

pub mod adapter;
pub mod clique;
pub mod document;
pub mod driver;
pub mod error;
pub mod fingerprint;
pub mod graph;
pub mod ledger;
pub mod manifest;
pub mod netsimile;
pub mod parser;
pub mod store;

pub use error::{NabuError, NabuErrorCode, Result};
pub use fingerprint::build_fingerprint;
pub use graph::{AssociationGraph, LabeledGraph, SimilarityScores};
