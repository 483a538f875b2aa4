//! Location graph: edge ingestion and symmetric distance lookup.
//!
//! The graph is built once from a flat edge list (or a labelled distance
//! matrix) and is read-only afterwards, so it can be shared across
//! parallel runs behind an `Arc`.

mod distance;
mod edge;
mod generate;
mod matrix;

pub use distance::{DistanceGraph, GraphBuilder, NodeIx};
pub use edge::Edge;
pub use generate::random_edges;
pub use matrix::{from_matrix, parse_matrix_csv};
