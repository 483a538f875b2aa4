//! SA configuration and cooling schedules.

use std::time::Duration;

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Cooling schedule for temperature reduction.
///
/// Both schedules decrease the temperature strictly at every step.
///
/// # References
///
/// - Geometric: standard textbook approach
/// - LundyMees: Lundy & Mees (1986), with convergence proof
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CoolingSchedule {
    /// Geometric (exponential) cooling: `T_{k+1} = alpha * T_k`.
    Geometric {
        /// Cooling factor in (0, 1). Higher = slower cooling.
        alpha: f64,
    },

    /// Lundy-Mees cooling: `T_{k+1} = T_k / (1 + beta * T_k)`.
    ///
    /// One iteration per temperature step.
    LundyMees {
        /// Cooling parameter. Typically `(T_0 - T_min) / (max_iter * T_0 * T_min)`.
        beta: f64,
    },
}

impl Default for CoolingSchedule {
    fn default() -> Self {
        CoolingSchedule::Geometric { alpha: 0.9 }
    }
}

impl CoolingSchedule {
    /// Next temperature after one step.
    pub fn next(&self, temperature: f64) -> f64 {
        match *self {
            CoolingSchedule::Geometric { alpha } => temperature * alpha,
            CoolingSchedule::LundyMees { beta } => temperature / (1.0 + beta * temperature),
        }
    }
}

/// Configuration for the annealing runner.
///
/// # Examples
///
/// ```
/// use u_tour::sa::{CoolingSchedule, SaConfig};
///
/// let config = SaConfig::default()
///     .with_initial_temperature(1000.0)
///     .with_min_temperature(1.0)
///     .with_cooling(CoolingSchedule::Geometric { alpha: 0.9 })
///     .with_iterations_per_temperature(50)
///     .with_max_restarts(5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SaConfig {
    /// Initial temperature. Higher values allow more exploration.
    pub initial_temperature: f64,

    /// The attempt ends once the temperature is no longer above this.
    pub min_temperature: f64,

    /// Cooling schedule.
    pub cooling: CoolingSchedule,

    /// Number of proposals at each temperature level.
    ///
    /// For `LundyMees`, this is ignored (1 proposal per temperature).
    pub iterations_per_temperature: usize,

    /// Consecutive rejected proposals after which the attempt is
    /// considered converged.
    pub stagnation_limit: usize,

    /// Fresh restarts allowed after an attempt that found no solution.
    pub max_restarts: usize,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,

    /// Wall-clock budget for one `run`, restarts included.
    pub time_limit: Option<Duration>,

    /// Whether `best_of_x` and parameter tuning use the rayon pool.
    pub parallel: bool,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1000.0,
            min_temperature: 1.0,
            cooling: CoolingSchedule::default(),
            iterations_per_temperature: 50,
            stagnation_limit: 1500,
            max_restarts: 10,
            seed: None,
            time_limit: None,
            parallel: true,
        }
    }
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.cooling = cooling;
        self
    }

    /// Shorthand for geometric cooling with factor `alpha`.
    pub fn with_cooling_factor(self, alpha: f64) -> Self {
        self.with_cooling(CoolingSchedule::Geometric { alpha })
    }

    pub fn with_iterations_per_temperature(mut self, n: usize) -> Self {
        self.iterations_per_temperature = n;
        self
    }

    pub fn with_stagnation_limit(mut self, n: usize) -> Self {
        self.stagnation_limit = n;
        self
    }

    pub fn with_max_restarts(mut self, n: usize) -> Self {
        self.max_restarts = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.initial_temperature.is_finite() && self.initial_temperature > 0.0) {
            return Err(Error::invalid_config("initial_temperature must be positive"));
        }
        if !(self.min_temperature > 0.0) {
            return Err(Error::invalid_config("min_temperature must be positive"));
        }
        if self.min_temperature >= self.initial_temperature {
            return Err(Error::invalid_config(
                "min_temperature must be less than initial_temperature",
            ));
        }
        match self.cooling {
            CoolingSchedule::Geometric { alpha } => {
                if !(alpha > 0.0 && alpha < 1.0) {
                    return Err(Error::invalid_config(format!(
                        "geometric alpha must be in (0, 1), got {alpha}"
                    )));
                }
            }
            CoolingSchedule::LundyMees { beta } => {
                if !(beta > 0.0 && beta.is_finite()) {
                    return Err(Error::invalid_config(format!(
                        "lundy-mees beta must be positive, got {beta}"
                    )));
                }
            }
        }
        if self.iterations_per_temperature == 0 {
            return Err(Error::invalid_config(
                "iterations_per_temperature must be positive",
            ));
        }
        if self.stagnation_limit == 0 {
            return Err(Error::invalid_config("stagnation_limit must be positive"));
        }
        if self.max_restarts == 0 {
            return Err(Error::invalid_config("max_restarts must be positive"));
        }
        Ok(())
    }
}
