//! Routing cost and neighbor-generation settings.

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration shared by the routing problem variants.
///
/// # Examples
///
/// ```
/// use u_tour::tsp::RoutingConfig;
///
/// let config = RoutingConfig::default()
///     .with_missing_edge_penalty(5_000.0)
///     .with_max_neighbor_attempts(200);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoutingConfig {
    /// Added to the cost for every hop (including the closing hop) that
    /// has no edge in the graph.
    pub missing_edge_penalty: f64,

    /// Added to the cost for every required node the tour never visits.
    pub missing_node_penalty: f64,

    /// How many random moves `random_neighbor` tries before giving up and
    /// returning the current tour unchanged.
    pub max_neighbor_attempts: usize,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            missing_edge_penalty: 10_000.0,
            missing_node_penalty: 10_000.0,
            max_neighbor_attempts: 1_000,
        }
    }
}

impl RoutingConfig {
    pub fn with_missing_edge_penalty(mut self, penalty: f64) -> Self {
        self.missing_edge_penalty = penalty;
        self
    }

    pub fn with_missing_node_penalty(mut self, penalty: f64) -> Self {
        self.missing_node_penalty = penalty;
        self
    }

    pub fn with_max_neighbor_attempts(mut self, n: usize) -> Self {
        self.max_neighbor_attempts = n;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.missing_edge_penalty.is_finite() && self.missing_edge_penalty >= 0.0) {
            return Err(Error::invalid_config(format!(
                "missing_edge_penalty must be finite and non-negative, got {}",
                self.missing_edge_penalty
            )));
        }
        if !(self.missing_node_penalty.is_finite() && self.missing_node_penalty >= 0.0) {
            return Err(Error::invalid_config(format!(
                "missing_node_penalty must be finite and non-negative, got {}",
                self.missing_node_penalty
            )));
        }
        if self.max_neighbor_attempts == 0 {
            return Err(Error::invalid_config("max_neighbor_attempts must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RoutingConfig::default();
        assert!((config.missing_node_penalty - 10_000.0).abs() < 1e-10);
        assert_eq!(config.max_neighbor_attempts, 1_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(RoutingConfig::default()
            .with_missing_edge_penalty(-1.0)
            .validate()
            .is_err());
        assert!(RoutingConfig::default()
            .with_missing_node_penalty(f64::INFINITY)
            .validate()
            .is_err());
        assert!(RoutingConfig::default()
            .with_max_neighbor_attempts(0)
            .validate()
            .is_err());
    }
}
