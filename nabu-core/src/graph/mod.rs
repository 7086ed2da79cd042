//! The labeled graph (C1) and its association-graph derivative (C3).

mod association;
mod labeled;

pub use association::{AssociationGraph, SimilarityScores};
pub use labeled::{LabeledGraph, Vertex};
