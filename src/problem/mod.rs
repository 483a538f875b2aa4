//! The problem seam between routing models and the optimizer.

mod types;

pub use types::{GraphProblem, Problem, Tour};
