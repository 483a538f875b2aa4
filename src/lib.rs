//! Tour optimization over weighted graphs by Simulated Annealing.
//!
//! - **[`graph`]**: symmetric distance graphs built from edge lists,
//!   distance matrices, or random generation.
//! - **[`problem`]**: the [`Problem`](problem::Problem) contract the
//!   optimizer searches over.
//! - **[`tsp`]**: routing with five random structural moves.
//! - **[`centrality`]**: routing that grows paths toward high-centrality
//!   neighbors, with a short-term memory of recent picks.
//! - **[`ev`]**: a battery-constrained decorator for any routing problem.
//! - **[`sa`]**: the annealing runner, best-of-x and parameter tuning.
//!
//! # Example
//!
//! ```
//! use u_tour::graph::Edge;
//! use u_tour::sa::{SaConfig, SaRunner};
//! use u_tour::tsp::RoutingProblem;
//!
//! let edges = vec![
//!     Edge::new("l1", "l2", 5.0),
//!     Edge::new("l2", "l3", 6.0),
//!     Edge::new("l3", "l4", 7.0),
//!     Edge::new("l4", "l1", 8.0),
//! ];
//! let problem = RoutingProblem::from_edges(&edges, "l1")?;
//! let outcome = SaRunner::best_of_x(&problem, 8, &SaConfig::default().with_seed(7))?;
//! assert_eq!(outcome.best_cost(), 26.0);
//! # Ok::<(), u_tour::Error>(())
//! ```

pub mod centrality;
pub mod error;
pub mod ev;
pub mod graph;
pub mod problem;
pub mod sa;
pub mod tsp;

pub use error::{Error, Result};
