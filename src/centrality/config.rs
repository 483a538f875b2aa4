//! Centrality-guided extension settings.

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for [`CentralityRouting`](super::CentralityRouting).
///
/// # Examples
///
/// ```
/// use u_tour::centrality::CentralityConfig;
///
/// let config = CentralityConfig::default().with_memory_capacity(3);
/// assert_eq!(config.memory_capacity, 3);
/// assert!((config.revisit_penalty - 0.9).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CentralityConfig {
    /// How many recently appended nodes are excluded from extension.
    pub memory_capacity: usize,

    /// Subtracted from a candidate's score once per existing visit.
    pub revisit_penalty: f64,

    /// Initial random walk length as a fraction of the node count.
    pub initial_walk_fraction: f64,
}

impl Default for CentralityConfig {
    fn default() -> Self {
        Self {
            memory_capacity: 2,
            revisit_penalty: 0.9,
            initial_walk_fraction: 0.5,
        }
    }
}

impl CentralityConfig {
    pub fn with_memory_capacity(mut self, n: usize) -> Self {
        self.memory_capacity = n;
        self
    }

    pub fn with_revisit_penalty(mut self, penalty: f64) -> Self {
        self.revisit_penalty = penalty;
        self
    }

    pub fn with_initial_walk_fraction(mut self, fraction: f64) -> Self {
        self.initial_walk_fraction = fraction;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.revisit_penalty.is_finite() && self.revisit_penalty >= 0.0) {
            return Err(Error::invalid_config(format!(
                "revisit_penalty must be finite and non-negative, got {}",
                self.revisit_penalty
            )));
        }
        if !(self.initial_walk_fraction > 0.0 && self.initial_walk_fraction <= 1.0) {
            return Err(Error::invalid_config(format!(
                "initial_walk_fraction must be in (0, 1], got {}",
                self.initial_walk_fraction
            )));
        }
        Ok(())
    }
}
