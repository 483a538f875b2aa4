//! Offline grid search over cooling parameters.
//!
//! Not part of the runner's contract: this repeatedly calls
//! [`SaRunner::run`] to compare parameter combinations on one problem.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use super::config::SaConfig;
use super::runner::SaRunner;
use crate::error::{Error, Result};
use crate::problem::Problem;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Candidate values for each tuned parameter.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParameterGrid {
    pub initial_temperatures: Vec<f64>,
    pub cooling_factors: Vec<f64>,
    pub iterations_per_temperature: Vec<usize>,
}

impl ParameterGrid {
    fn combinations(&self) -> Vec<(f64, f64, usize)> {
        let mut out = Vec::new();
        for &t0 in &self.initial_temperatures {
            for &alpha in &self.cooling_factors {
                for &n in &self.iterations_per_temperature {
                    out.push((t0, alpha, n));
                }
            }
        }
        out
    }
}

/// Aggregated outcome of one parameter combination.
#[derive(Debug, Clone, PartialEq)]
pub struct TuningResult {
    pub initial_temperature: f64,
    pub cooling_factor: f64,
    pub iterations_per_temperature: usize,
    /// Most frequent best cost across executions (`INFINITY` for runs
    /// that found no solution). Ties go to the value seen first.
    pub mode_cost: f64,
    /// Fastest execution among those that reached `mode_cost`.
    pub min_time: Duration,
}

/// Runs every combination `executions_per_combination` times and ranks
/// them by modal cost, then by the fastest run achieving it.
///
/// `base` supplies every setting not in the grid (minimum temperature,
/// stagnation limit, restarts, seed, parallelism). Execution `k` of
/// combination `c` is seeded with `seed + c * executions + k`.
///
/// # Examples
///
/// ```
/// use u_tour::graph::Edge;
/// use u_tour::sa::{get_best_parameters, ParameterGrid, SaConfig};
/// use u_tour::tsp::RoutingProblem;
///
/// let edges = vec![
///     Edge::new("a", "b", 1.0),
///     Edge::new("b", "c", 1.0),
///     Edge::new("c", "a", 1.0),
/// ];
/// let problem = RoutingProblem::from_edges(&edges, "a").unwrap();
/// let grid = ParameterGrid {
///     initial_temperatures: vec![10.0, 100.0],
///     cooling_factors: vec![0.5],
///     iterations_per_temperature: vec![5],
/// };
/// let ranked = get_best_parameters(&problem, &grid, &SaConfig::default().with_seed(3), 2).unwrap();
/// assert_eq!(ranked.len(), 2);
/// assert_eq!(ranked[0].mode_cost, 3.0);
/// ```
pub fn get_best_parameters<P: Problem + Clone>(
    problem: &P,
    grid: &ParameterGrid,
    base: &SaConfig,
    executions_per_combination: usize,
) -> Result<Vec<TuningResult>> {
    if executions_per_combination == 0 {
        return Err(Error::invalid_parameter(
            "executions_per_combination must be positive",
        ));
    }
    let combinations = grid.combinations();
    if combinations.is_empty() {
        return Err(Error::invalid_parameter("parameter grid is empty"));
    }

    let base_seed = base.seed.unwrap_or_else(rand::random);
    let configs = combinations
        .iter()
        .enumerate()
        .map(|(c, &(t0, alpha, n))| {
            let config = base
                .clone()
                .with_initial_temperature(t0)
                .with_cooling_factor(alpha)
                .with_iterations_per_temperature(n)
                .with_seed(base_seed.wrapping_add((c * executions_per_combination) as u64));
            config.validate().map(|_| config)
        })
        .collect::<Result<Vec<_>>>()?;

    type Combination = (f64, f64, usize);
    let evaluate = |(&(t0, alpha, n), config): (&Combination, &SaConfig)| -> Result<TuningResult> {
        let mut samples = Vec::with_capacity(executions_per_combination);
        for k in 0..executions_per_combination {
            let mut own = problem.clone();
            let seed = config.seed.unwrap_or_default().wrapping_add(k as u64);
            let run_config = config.clone().with_seed(seed);
            let started = Instant::now();
            let outcome = SaRunner::run(&mut own, &run_config)?;
            samples.push((outcome.best_cost(), started.elapsed()));
        }
        let (mode_cost, min_time) = mode_and_fastest(&samples);
        log::debug!("tuning T0={t0} alpha={alpha} n={n}: mode={mode_cost} min_time={min_time:?}");
        Ok(TuningResult {
            initial_temperature: t0,
            cooling_factor: alpha,
            iterations_per_temperature: n,
            mode_cost,
            min_time,
        })
    };

    let mut results: Vec<TuningResult> = if base.parallel {
        combinations
            .par_iter()
            .zip(configs.par_iter())
            .map(evaluate)
            .collect::<Result<_>>()?
    } else {
        combinations
            .iter()
            .zip(configs.iter())
            .map(evaluate)
            .collect::<Result<_>>()?
    };

    results.sort_by(|a, b| {
        a.mode_cost
            .total_cmp(&b.mode_cost)
            .then(a.min_time.cmp(&b.min_time))
    });
    Ok(results)
}

/// Statistical mode of the costs (exact equality, first seen wins ties)
/// and the shortest time among samples at that cost.
fn mode_and_fastest(samples: &[(f64, Duration)]) -> (f64, Duration) {
    let mut counts: HashMap<u64, usize> = HashMap::new();
    for (cost, _) in samples {
        *counts.entry(cost.to_bits()).or_default() += 1;
    }

    let mut mode = f64::INFINITY;
    let mut best_count = 0;
    for (cost, _) in samples {
        let count = counts[&cost.to_bits()];
        if count > best_count {
            best_count = count;
            mode = *cost;
        }
    }

    let min_time = samples
        .iter()
        .filter(|(cost, _)| cost.to_bits() == mode.to_bits())
        .map(|&(_, t)| t)
        .min()
        .unwrap_or_default();
    (mode, min_time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Edge;
    use crate::tsp::RoutingProblem;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_mode_first_seen_wins_ties() {
        let samples = vec![(5.0, ms(3)), (4.0, ms(1)), (5.0, ms(2)), (4.0, ms(9))];
        assert_eq!(mode_and_fastest(&samples), (5.0, ms(2)));
    }

    #[test]
    fn test_mode_majority() {
        let samples = vec![(7.0, ms(3)), (4.0, ms(5)), (4.0, ms(4))];
        assert_eq!(mode_and_fastest(&samples), (4.0, ms(4)));
    }

    #[test]
    fn test_rejects_empty_inputs() {
        let edges = vec![Edge::new("a", "b", 1.0)];
        let problem = RoutingProblem::from_edges(&edges, "a").unwrap();
        let grid = ParameterGrid::default();
        assert!(get_best_parameters(&problem, &grid, &SaConfig::default(), 1).is_err());

        let grid = ParameterGrid {
            initial_temperatures: vec![10.0],
            cooling_factors: vec![0.5],
            iterations_per_temperature: vec![5],
        };
        assert!(get_best_parameters(&problem, &grid, &SaConfig::default(), 0).is_err());
    }

    #[test]
    fn test_invalid_combination_is_an_error() {
        let edges = vec![Edge::new("a", "b", 1.0)];
        let problem = RoutingProblem::from_edges(&edges, "a").unwrap();
        let grid = ParameterGrid {
            initial_temperatures: vec![0.5],
            cooling_factors: vec![0.5],
            iterations_per_temperature: vec![5],
        };
        // min_temperature defaults to 1.0, above T0.
        assert!(get_best_parameters(&problem, &grid, &SaConfig::default(), 1).is_err());
    }

    #[test]
    fn test_results_sorted_by_cost_then_time() {
        let edges = vec![
            Edge::new("l1", "l2", 5.0),
            Edge::new("l2", "l3", 6.0),
            Edge::new("l3", "l4", 7.0),
            Edge::new("l4", "l1", 8.0),
        ];
        let problem = RoutingProblem::from_edges(&edges, "l1").unwrap();
        let grid = ParameterGrid {
            initial_temperatures: vec![50.0, 500.0],
            cooling_factors: vec![0.5, 0.9],
            iterations_per_temperature: vec![10],
        };
        let ranked =
            get_best_parameters(&problem, &grid, &SaConfig::default().with_seed(9), 3).unwrap();
        assert_eq!(ranked.len(), 4);
        for w in ranked.windows(2) {
            assert!(
                w[0].mode_cost < w[1].mode_cost
                    || (w[0].mode_cost == w[1].mode_cost && w[0].min_time <= w[1].min_time)
            );
        }
    }
}
