//! Simulated Annealing (SA).
//!
//! A single-solution trajectory metaheuristic inspired by the physical
//! annealing process. Accepts worsening moves with a probability that
//! decreases over time (temperature), allowing the search to escape
//! local optima.
//!
//! The runner works on any [`Problem`](crate::problem::Problem). Costs are
//! minimized; [`fitness`] gives the reciprocal view for callers that want
//! higher-is-better scores.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"
//! - Lundy & Mees (1986), "Convergence of an Annealing Algorithm"

mod config;
mod runner;
mod tune;
mod types;

pub use config::{CoolingSchedule, SaConfig};
pub use runner::{acceptance_probability, energy_change, SaRunner};
pub use tune::{get_best_parameters, ParameterGrid, TuningResult};
pub use types::{fitness, NoSolution, SaOutcome, SaResult};
