//! Results reported by the annealing runner.

/// Outcome of a completed annealing run.
///
/// `NoSolution` is an ordinary result, not an error: the graph may simply
/// have no tour covering every node.
#[derive(Debug, Clone)]
pub enum SaOutcome<S: Clone> {
    /// At least one attempt produced a valid, complete state.
    Solved(SaResult<S>),
    /// Every attempt (or the time budget) ran out without a solution.
    NoSolution(NoSolution),
}

impl<S: Clone> SaOutcome<S> {
    pub fn is_solved(&self) -> bool {
        matches!(self, SaOutcome::Solved(_))
    }

    pub fn solution(&self) -> Option<&SaResult<S>> {
        match self {
            SaOutcome::Solved(r) => Some(r),
            SaOutcome::NoSolution(_) => None,
        }
    }

    pub fn into_solution(self) -> Option<SaResult<S>> {
        match self {
            SaOutcome::Solved(r) => Some(r),
            SaOutcome::NoSolution(_) => None,
        }
    }

    /// Best cost, or `f64::INFINITY` without a solution.
    pub fn best_cost(&self) -> f64 {
        self.solution().map_or(f64::INFINITY, |r| r.best_cost)
    }
}

/// The best state found by a run, with search statistics.
#[derive(Debug, Clone)]
pub struct SaResult<S: Clone> {
    /// The best valid, complete state found.
    pub best: S,

    /// Cost of `best`. Lower is better.
    pub best_cost: f64,

    /// Total proposals evaluated, across restarts.
    pub iterations: usize,

    /// Accepted proposals (including improvements), across restarts.
    pub accepted_moves: usize,

    /// Strictly improving proposals, across restarts.
    pub improving_moves: usize,

    /// Restarts used before the solving attempt (0 = first attempt).
    pub restarts: usize,

    /// Temperature when the solving attempt stopped.
    pub final_temperature: f64,

    /// Whether the solving attempt stopped on the stagnation limit.
    pub stagnated: bool,

    /// Whether the run was cut short by cancellation or the time limit.
    pub cancelled: bool,

    /// Best cost sampled at regular intervals during the solving attempt;
    /// `f64::INFINITY` until a solution is seen.
    pub cost_history: Vec<f64>,
}

impl<S: Clone> SaResult<S> {
    /// Higher-is-better view of [`best_cost`](Self::best_cost).
    pub fn fitness(&self) -> f64 {
        fitness(self.best_cost)
    }
}

/// Reciprocal of a non-negative cost, guarded: an infinite cost maps to
/// `0`, and costs at or below `f64::EPSILON` map to `1 / f64::EPSILON`.
pub fn fitness(cost: f64) -> f64 {
    if cost.is_nan() || cost == f64::INFINITY {
        0.0
    } else {
        1.0 / cost.max(f64::EPSILON)
    }
}

/// Report for a run that never found a solution.
#[derive(Debug, Clone, PartialEq)]
pub struct NoSolution {
    /// Annealing attempts started (first attempt plus restarts).
    pub attempts: usize,
    /// Total proposals evaluated.
    pub iterations: usize,
    /// Whether cancellation or the time limit ended the search early.
    pub cancelled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fitness_guards() {
        assert_eq!(fitness(f64::INFINITY), 0.0);
        assert_eq!(fitness(f64::NAN), 0.0);
        assert_eq!(fitness(0.0), 1.0 / f64::EPSILON);
        assert!((fitness(4.0) - 0.25).abs() < 1e-15);
    }

    #[test]
    fn test_outcome_accessors() {
        let none: SaOutcome<Vec<usize>> = SaOutcome::NoSolution(NoSolution {
            attempts: 3,
            iterations: 10,
            cancelled: false,
        });
        assert!(!none.is_solved());
        assert_eq!(none.best_cost(), f64::INFINITY);
        assert!(none.into_solution().is_none());
    }
}
