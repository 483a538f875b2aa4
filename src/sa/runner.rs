//! SA execution loop.
//!
//! # Algorithm
//!
//! 1. Start from `problem.initial_state()` at `initial_temperature`
//! 2. At each temperature level, propose `iterations_per_temperature`
//!    neighbors and accept each by the Metropolis criterion
//! 3. Track the best state that is both valid and a complete solution
//! 4. Cool, until `min_temperature` or the stagnation limit is reached
//! 5. If no solution was seen, restart from a fresh initial state, at most
//!    `max_restarts` times

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use super::config::{CoolingSchedule, SaConfig};
use super::types::{NoSolution, SaOutcome, SaResult};
use crate::error::{Error, Result};
use crate::problem::Problem;

/// Probability of accepting a move that changes cost by `delta` at
/// `temperature`: `exp(-delta / T)`, capped at 1 for improving moves.
pub fn acceptance_probability(delta: f64, temperature: f64) -> f64 {
    if delta <= 0.0 {
        1.0
    } else if temperature > 0.0 {
        (-delta / temperature).exp()
    } else {
        0.0
    }
}

/// `candidate - current`, with two equal infinities counted as no change.
pub fn energy_change(current: f64, candidate: f64) -> f64 {
    let delta = candidate - current;
    if delta.is_nan() {
        0.0
    } else {
        delta
    }
}

pub(crate) fn create_rng(seed: Option<u64>) -> StdRng {
    StdRng::seed_from_u64(seed.unwrap_or_else(rand::random))
}

/// Stops a run on cancellation or once the deadline passes.
struct StopSignal {
    cancel: Option<Arc<AtomicBool>>,
    deadline: Option<Instant>,
}

impl StopSignal {
    fn triggered(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// One annealing attempt from a fresh initial state.
struct Attempt<S> {
    best: Option<(S, f64)>,
    iterations: usize,
    accepted_moves: usize,
    improving_moves: usize,
    final_temperature: f64,
    stagnated: bool,
    interrupted: bool,
    cost_history: Vec<f64>,
}

/// Executes Simulated Annealing.
pub struct SaRunner;

impl SaRunner {
    /// Runs SA optimization on `problem`.
    ///
    /// On return the problem's current state is the best state found (or
    /// the last state visited when nothing qualified).
    ///
    /// # Examples
    ///
    /// ```
    /// use u_tour::graph::Edge;
    /// use u_tour::sa::{SaConfig, SaRunner};
    /// use u_tour::tsp::RoutingProblem;
    ///
    /// let edges = vec![
    ///     Edge::new("l1", "l2", 5.0),
    ///     Edge::new("l2", "l3", 6.0),
    ///     Edge::new("l3", "l1", 7.0),
    /// ];
    /// let mut problem = RoutingProblem::from_edges(&edges, "l1").unwrap();
    /// let outcome = SaRunner::run(&mut problem, &SaConfig::default().with_seed(1)).unwrap();
    /// assert_eq!(outcome.best_cost(), 18.0);
    /// ```
    pub fn run<P: Problem>(problem: &mut P, config: &SaConfig) -> Result<SaOutcome<P::State>> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs SA with an optional cancellation token.
    pub fn run_with_cancel<P: Problem>(
        problem: &mut P,
        config: &SaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SaOutcome<P::State>> {
        config.validate()?;

        let mut rng = create_rng(config.seed);
        let stop = StopSignal {
            cancel,
            deadline: config.time_limit.map(|limit| Instant::now() + limit),
        };

        let mut iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut attempts = 0usize;
        let mut cancelled = false;

        for restart in 0..=config.max_restarts {
            if stop.triggered() {
                cancelled = true;
                break;
            }
            if restart > 0 {
                log::debug!("attempt {restart} found no solution; restarting from a fresh state");
            }

            attempts += 1;
            let attempt = anneal(problem, config, &mut rng, &stop);
            iterations += attempt.iterations;
            accepted_moves += attempt.accepted_moves;
            improving_moves += attempt.improving_moves;
            cancelled = attempt.interrupted;

            if let Some((best, best_cost)) = attempt.best {
                log::info!(
                    "annealing finished: cost={best_cost:.3}, iterations={iterations}, restarts={restart}"
                );
                return Ok(SaOutcome::Solved(SaResult {
                    best,
                    best_cost,
                    iterations,
                    accepted_moves,
                    improving_moves,
                    restarts: restart,
                    final_temperature: attempt.final_temperature,
                    stagnated: attempt.stagnated,
                    cancelled,
                    cost_history: attempt.cost_history,
                }));
            }
            if cancelled {
                break;
            }
        }

        log::warn!(
            "no solution after {attempts} attempt(s) and {iterations} iterations (cancelled={cancelled})"
        );
        Ok(SaOutcome::NoSolution(NoSolution {
            attempts,
            iterations,
            cancelled,
        }))
    }

    /// Runs `x` independent searches and keeps the lowest-cost solution.
    ///
    /// Each run works on its own clone of `problem` with seed
    /// `base + i`, where `base` is the configured seed (or a random one).
    /// Runs execute on the rayon pool when `config.parallel` is set.
    pub fn best_of_x<P: Problem + Clone>(
        problem: &P,
        x: usize,
        config: &SaConfig,
    ) -> Result<SaOutcome<P::State>> {
        Self::best_of_x_with_cancel(problem, x, config, None)
    }

    pub fn best_of_x_with_cancel<P: Problem + Clone>(
        problem: &P,
        x: usize,
        config: &SaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SaOutcome<P::State>> {
        if x == 0 {
            return Err(Error::invalid_parameter("best_of_x needs at least one run"));
        }
        config.validate()?;
        let base_seed = config.seed.unwrap_or_else(rand::random);

        let single = |i: usize| {
            let mut own = problem.clone();
            let run_config = config.clone().with_seed(base_seed.wrapping_add(i as u64));
            Self::run_with_cancel(&mut own, &run_config, cancel.clone())
        };
        let outcomes: Vec<SaOutcome<P::State>> = if config.parallel {
            (0..x).into_par_iter().map(single).collect::<Result<_>>()?
        } else {
            (0..x).map(single).collect::<Result<_>>()?
        };

        let mut best: Option<SaResult<P::State>> = None;
        let mut attempts = 0;
        let mut iterations = 0;
        let mut cancelled = false;
        for outcome in outcomes {
            match outcome {
                SaOutcome::Solved(r) => {
                    if best.as_ref().is_none_or(|b| r.best_cost < b.best_cost) {
                        best = Some(r);
                    }
                }
                SaOutcome::NoSolution(n) => {
                    attempts += n.attempts;
                    iterations += n.iterations;
                    cancelled |= n.cancelled;
                }
            }
        }

        Ok(match best {
            Some(r) => {
                log::info!("best of {x} runs: cost={:.3}", r.best_cost);
                SaOutcome::Solved(r)
            }
            None => SaOutcome::NoSolution(NoSolution {
                attempts,
                iterations,
                cancelled,
            }),
        })
    }
}

/// A state the runner may report: valid and complete.
fn admissible<P: Problem>(problem: &P, state: &P::State) -> bool {
    problem.validate(state) && problem.is_solution(state)
}

fn anneal<P: Problem, R: Rng>(
    problem: &mut P,
    config: &SaConfig,
    rng: &mut R,
    stop: &StopSignal,
) -> Attempt<P::State> {
    let mut current = problem.initial_state(rng);
    problem.set_current_state(current.clone());
    let mut current_cost = problem.cost(&current);

    let mut best = (current_cost.is_finite() && admissible(problem, &current))
        .then(|| (current.clone(), current_cost));

    let mut temperature = config.initial_temperature;
    let mut iterations = 0usize;
    let mut accepted_moves = 0usize;
    let mut improving_moves = 0usize;
    let mut stagnation = 0usize;
    let mut stagnated = false;
    let mut interrupted = false;

    let history_interval = 100.max(config.iterations_per_temperature);
    let best_so_far = |b: &Option<(P::State, f64)>| b.as_ref().map_or(f64::INFINITY, |(_, c)| *c);
    let mut cost_history = vec![best_so_far(&best)];

    while temperature > config.min_temperature {
        if stop.triggered() {
            interrupted = true;
            break;
        }

        let inner_iters = match config.cooling {
            CoolingSchedule::LundyMees { .. } => 1,
            CoolingSchedule::Geometric { .. } => config.iterations_per_temperature,
        };

        for _ in 0..inner_iters {
            let candidate = problem.random_neighbor(&current, rng);
            let candidate_cost = problem.cost(&candidate);
            let delta = energy_change(current_cost, candidate_cost);

            // Metropolis acceptance criterion
            let accept = if delta < 0.0 {
                improving_moves += 1;
                true
            } else {
                rng.random_range(0.0..1.0) < acceptance_probability(delta, temperature)
            };

            if accept {
                current = candidate;
                current_cost = candidate_cost;
                accepted_moves += 1;
                stagnation = 0;

                if current_cost < best_so_far(&best) && admissible(problem, &current) {
                    best = Some((current.clone(), current_cost));
                }
            } else {
                stagnation += 1;
            }

            iterations += 1;
            if iterations.is_multiple_of(history_interval) {
                cost_history.push(best_so_far(&best));
            }

            if stagnation >= config.stagnation_limit {
                stagnated = true;
                break;
            }
        }

        if stagnated {
            break;
        }
        temperature = config.cooling.next(temperature);
    }

    let final_best = best_so_far(&best);
    if cost_history
        .last()
        .is_none_or(|&last| last != final_best)
    {
        cost_history.push(final_best);
    }

    match &best {
        Some((state, _)) => problem.set_current_state(state.clone()),
        None => problem.set_current_state(current),
    }

    Attempt {
        best,
        iterations,
        accepted_moves,
        improving_moves,
        final_temperature: temperature,
        stagnated,
        interrupted,
        cost_history,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    // ---- Quadratic minimization: f(x) = x^2, minimum at 0 ----

    #[derive(Clone)]
    struct QuadraticProblem {
        current: f64,
    }

    impl Problem for QuadraticProblem {
        type State = f64;

        fn initial_state<R: Rng>(&mut self, rng: &mut R) -> f64 {
            rng.random_range(-10.0..10.0)
        }

        fn current_state(&self) -> &f64 {
            &self.current
        }

        fn set_current_state(&mut self, state: f64) {
            self.current = state;
        }

        fn random_neighbor<R: Rng>(&mut self, x: &f64, rng: &mut R) -> f64 {
            x + rng.random_range(-1.0..1.0)
        }

        fn validate(&self, _x: &f64) -> bool {
            true
        }

        fn is_solution(&self, _x: &f64) -> bool {
            true
        }

        fn cost(&self, x: &f64) -> f64 {
            x * x
        }
    }

    /// Never reports a solution.
    #[derive(Clone)]
    struct Hopeless {
        current: u32,
    }

    impl Problem for Hopeless {
        type State = u32;

        fn initial_state<R: Rng>(&mut self, _rng: &mut R) -> u32 {
            0
        }

        fn current_state(&self) -> &u32 {
            &self.current
        }

        fn set_current_state(&mut self, state: u32) {
            self.current = state;
        }

        fn random_neighbor<R: Rng>(&mut self, x: &u32, rng: &mut R) -> u32 {
            x.wrapping_add(rng.random_range(0..3))
        }

        fn validate(&self, _x: &u32) -> bool {
            true
        }

        fn is_solution(&self, _x: &u32) -> bool {
            false
        }

        fn cost(&self, x: &u32) -> f64 {
            *x as f64
        }
    }

    fn quick() -> SaConfig {
        SaConfig::default()
            .with_initial_temperature(100.0)
            .with_min_temperature(0.001)
            .with_cooling_factor(0.95)
            .with_iterations_per_temperature(50)
            .with_seed(42)
    }

    #[test]
    fn test_acceptance_probability() {
        assert_eq!(acceptance_probability(-5.0, 10.0), 1.0);
        assert_eq!(acceptance_probability(0.0, 10.0), 1.0);
        assert!((acceptance_probability(10.0, 10.0) - (-1.0f64).exp()).abs() < 1e-15);
        assert_eq!(acceptance_probability(f64::INFINITY, 10.0), 0.0);
        assert_eq!(acceptance_probability(1.0, 0.0), 0.0);
    }

    #[test]
    fn test_energy_change_infinities() {
        assert_eq!(energy_change(f64::INFINITY, f64::INFINITY), 0.0);
        assert_eq!(energy_change(f64::INFINITY, 3.0), f64::NEG_INFINITY);
        assert_eq!(energy_change(3.0, f64::INFINITY), f64::INFINITY);
        assert_eq!(energy_change(2.0, 5.0), 3.0);
    }

    #[test]
    fn test_sa_quadratic_geometric() {
        let mut problem = QuadraticProblem { current: 0.0 };
        let outcome = SaRunner::run(&mut problem, &quick().with_stagnation_limit(10_000)).unwrap();
        let result = outcome.solution().unwrap();

        assert!(
            result.best_cost < 1.0,
            "expected near-zero cost, got {}",
            result.best_cost
        );
        assert!(result.improving_moves > 0);
        assert!(result.accepted_moves > result.improving_moves);
        assert_eq!(*problem.current_state(), result.best);
    }

    #[test]
    fn test_sa_quadratic_lundy_mees() {
        let t0 = 100.0;
        let t_min = 0.001;
        let max_iter = 50000;
        let beta = (t0 - t_min) / (max_iter as f64 * t0 * t_min);

        let mut problem = QuadraticProblem { current: 0.0 };
        let config = quick()
            .with_cooling(CoolingSchedule::LundyMees { beta })
            .with_stagnation_limit(10_000);

        let outcome = SaRunner::run(&mut problem, &config).unwrap();
        assert!(outcome.best_cost() < 1.0, "got {}", outcome.best_cost());
    }

    #[test]
    fn test_sa_rejects_invalid_config() {
        let mut problem = QuadraticProblem { current: 0.0 };
        let config = quick().with_min_temperature(1000.0);
        assert!(matches!(
            SaRunner::run(&mut problem, &config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_sa_cancellation() {
        let mut problem = QuadraticProblem { current: 0.0 };
        let config = quick()
            .with_initial_temperature(1e10)
            .with_min_temperature(1e-15);

        // Set cancel flag before running so the outcome is deterministic.
        let cancel = Arc::new(AtomicBool::new(true));

        let outcome = SaRunner::run_with_cancel(&mut problem, &config, Some(cancel)).unwrap();
        match outcome {
            SaOutcome::NoSolution(n) => {
                assert!(n.cancelled);
                assert_eq!(n.iterations, 0);
            }
            SaOutcome::Solved(_) => panic!("cancelled run should not solve"),
        }
    }

    #[test]
    fn test_sa_time_limit_stops_search() {
        let mut problem = Hopeless { current: 0 };
        let config = quick()
            .with_initial_temperature(1e10)
            .with_min_temperature(1e-15)
            .with_cooling_factor(0.999_999)
            .with_max_restarts(1_000_000)
            .with_time_limit(std::time::Duration::from_millis(50));

        let started = Instant::now();
        let outcome = SaRunner::run(&mut problem, &config).unwrap();
        assert!(started.elapsed() < std::time::Duration::from_secs(10));
        assert!(matches!(
            outcome,
            SaOutcome::NoSolution(NoSolution { cancelled: true, .. })
        ));
    }

    #[test]
    fn test_sa_restarts_are_bounded() {
        let mut problem = Hopeless { current: 0 };
        let config = quick()
            .with_initial_temperature(10.0)
            .with_min_temperature(1.0)
            .with_cooling_factor(0.5)
            .with_iterations_per_temperature(5)
            .with_max_restarts(3);

        let outcome = SaRunner::run(&mut problem, &config).unwrap();
        match outcome {
            SaOutcome::NoSolution(n) => {
                assert_eq!(n.attempts, 4);
                assert!(!n.cancelled);
                assert!(n.iterations > 0);
            }
            SaOutcome::Solved(_) => panic!("hopeless problem cannot be solved"),
        }
    }

    #[test]
    fn test_sa_stagnation_ends_attempt() {
        let mut problem = QuadraticProblem { current: 0.0 };
        let config = quick()
            .with_initial_temperature(1e-2)
            .with_min_temperature(1e-12)
            .with_cooling_factor(0.999)
            .with_stagnation_limit(20);

        let result = SaRunner::run(&mut problem, &config)
            .unwrap()
            .into_solution()
            .unwrap();
        assert!(result.stagnated);
        assert!(result.final_temperature > 1e-12);
    }

    #[test]
    fn test_sa_cost_history_non_increasing() {
        let mut problem = QuadraticProblem { current: 0.0 };
        let config = quick().with_initial_temperature(50.0).with_min_temperature(0.01);

        let result = SaRunner::run(&mut problem, &config)
            .unwrap()
            .into_solution()
            .unwrap();

        for window in result.cost_history.windows(2) {
            assert!(
                window[1] <= window[0] + 1e-10,
                "best cost history should be non-increasing: {} > {}",
                window[1],
                window[0]
            );
        }
    }

    #[test]
    fn test_sa_metropolis_accepts_uphill() {
        // At very high temperature, almost all moves should be accepted
        let mut problem = QuadraticProblem { current: 0.0 };
        let config = quick()
            .with_initial_temperature(1e8)
            .with_min_temperature(1e7) // stay at very high temp
            .with_cooling_factor(0.99)
            .with_iterations_per_temperature(1000);

        let result = SaRunner::run(&mut problem, &config)
            .unwrap()
            .into_solution()
            .unwrap();

        let acceptance_ratio = result.accepted_moves as f64 / result.iterations as f64;
        assert!(
            acceptance_ratio > 0.8,
            "expected high acceptance at high temp, got {acceptance_ratio}"
        );
    }

    #[test]
    fn test_same_seed_same_result() {
        let config = quick();
        let a = SaRunner::run(&mut QuadraticProblem { current: 0.0 }, &config).unwrap();
        let b = SaRunner::run(&mut QuadraticProblem { current: 0.0 }, &config).unwrap();
        assert_eq!(a.best_cost(), b.best_cost());
    }

    #[test]
    fn test_best_of_x_keeps_lowest_cost() {
        let problem = QuadraticProblem { current: 0.0 };
        let config = quick().with_initial_temperature(5.0).with_min_temperature(1.0);

        let best = SaRunner::best_of_x(&problem, 6, &config).unwrap();
        for i in 0..6u64 {
            let single = SaRunner::run(
                &mut problem.clone(),
                &config.clone().with_seed(42 + i),
            )
            .unwrap();
            assert!(best.best_cost() <= single.best_cost());
        }
    }

    #[test]
    fn test_best_of_x_sequential_matches_parallel() {
        let problem = QuadraticProblem { current: 0.0 };
        let config = quick();
        let par = SaRunner::best_of_x(&problem, 4, &config).unwrap();
        let seq = SaRunner::best_of_x(&problem, 4, &config.clone().with_parallel(false)).unwrap();
        assert_eq!(par.best_cost(), seq.best_cost());
    }

    #[test]
    fn test_best_of_x_zero_runs() {
        let problem = QuadraticProblem { current: 0.0 };
        assert!(SaRunner::best_of_x(&problem, 0, &quick()).is_err());
    }

    #[test]
    fn test_best_of_x_no_solution_aggregates() {
        let problem = Hopeless { current: 0 };
        let config = quick()
            .with_initial_temperature(4.0)
            .with_min_temperature(1.0)
            .with_cooling_factor(0.5)
            .with_iterations_per_temperature(3)
            .with_max_restarts(2);
        match SaRunner::best_of_x(&problem, 3, &config).unwrap() {
            SaOutcome::NoSolution(n) => assert_eq!(n.attempts, 9),
            SaOutcome::Solved(_) => panic!("hopeless problem cannot be solved"),
        }
    }
}
