//! Capability traits the optimizer depends on.

use rand::Rng;

use crate::graph::{DistanceGraph, NodeIx};

/// An ordered, possibly partial route. Index 0 is the start node.
pub type Tour = Vec<NodeIx>;

/// Defines a problem the annealing runner can search.
///
/// The runner never looks inside a state: it asks the problem for starting
/// points and neighbors, and scores them through [`cost`](Self::cost).
///
/// # Minimization
///
/// `cost` is always lower-is-better. Problems with a natural fitness
/// (higher-is-better) must negate or invert it here, once.
///
/// # Mutability
///
/// `initial_state` and `random_neighbor` take `&mut self` so that problems
/// may keep search-local memory (e.g. a recently-visited list). Every
/// independent run therefore owns its own problem instance; read-only data
/// such as the distance graph should be shared behind an `Arc`.
///
/// # Examples
///
/// ```
/// use rand::Rng;
/// use u_tour::problem::Problem;
///
/// struct Countdown { current: i64 }
///
/// impl Problem for Countdown {
///     type State = i64;
///
///     fn initial_state<R: Rng>(&mut self, rng: &mut R) -> i64 {
///         rng.random_range(0..100)
///     }
///     fn current_state(&self) -> &i64 { &self.current }
///     fn set_current_state(&mut self, state: i64) { self.current = state; }
///     fn random_neighbor<R: Rng>(&mut self, current: &i64, rng: &mut R) -> i64 {
///         current + rng.random_range(-1..=1)
///     }
///     fn validate(&self, _state: &i64) -> bool { true }
///     fn is_solution(&self, state: &i64) -> bool { *state >= 0 }
///     fn cost(&self, state: &i64) -> f64 { state.abs() as f64 }
/// }
/// ```
pub trait Problem: Send + Sync {
    /// The state representation.
    type State: Clone + Send + PartialEq + std::fmt::Debug;

    /// Creates a starting state. May consume randomness and reset
    /// search-local memory, nothing else.
    fn initial_state<R: Rng>(&mut self, rng: &mut R) -> Self::State;

    /// The state last stored with [`set_current_state`](Self::set_current_state).
    fn current_state(&self) -> &Self::State;

    /// Replaces the current state. Not validated.
    fn set_current_state(&mut self, state: Self::State);

    /// Produces a candidate by applying one random move to `current`.
    ///
    /// Implementations must terminate: when no acceptable candidate turns
    /// up within their attempt budget they return `current` unchanged.
    fn random_neighbor<R: Rng>(&mut self, current: &Self::State, rng: &mut R) -> Self::State;

    /// Structural check (for routes: every hop is an existing edge).
    fn validate(&self, state: &Self::State) -> bool;

    /// Completeness check. A solution need not be valid.
    fn is_solution(&self, state: &Self::State) -> bool;

    /// Lower is better. May be `f64::INFINITY` for infeasible states.
    fn cost(&self, state: &Self::State) -> f64;

    /// Optional secondary estimate, unused by the runner.
    fn heuristic(&self, _state: &Self::State) -> f64 {
        0.0
    }
}

/// A routing problem over a [`DistanceGraph`].
///
/// Decorators such as the battery-constrained variant wrap any
/// `GraphProblem` and reuse its graph for their own checks.
pub trait GraphProblem: Problem<State = Tour> {
    fn graph(&self) -> &DistanceGraph;
}
