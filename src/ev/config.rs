//! Battery settings for electric-vehicle routing.

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for [`BatteryConstrained`](super::BatteryConstrained).
///
/// # Examples
///
/// ```
/// use u_tour::ev::BatteryConfig;
///
/// let config = BatteryConfig::default()
///     .with_capacity(60.0)
///     .with_station_prefix("CS");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BatteryConfig {
    /// Full charge, in distance units.
    pub capacity: f64,

    /// Nodes whose identifier starts with this prefix recharge the battery.
    pub station_prefix: String,

    /// Calls to the wrapped problem's `random_neighbor` before falling back
    /// to the current tour.
    pub max_neighbor_attempts: usize,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            capacity: 100.0,
            station_prefix: "ChargingStation".to_string(),
            max_neighbor_attempts: 100,
        }
    }
}

impl BatteryConfig {
    pub fn with_capacity(mut self, capacity: f64) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_station_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.station_prefix = prefix.into();
        self
    }

    pub fn with_max_neighbor_attempts(mut self, n: usize) -> Self {
        self.max_neighbor_attempts = n;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.capacity.is_finite() && self.capacity > 0.0) {
            return Err(Error::invalid_config(format!(
                "battery capacity must be positive and finite, got {}",
                self.capacity
            )));
        }
        if self.station_prefix.is_empty() {
            return Err(Error::invalid_config("station_prefix must not be empty"));
        }
        if self.max_neighbor_attempts == 0 {
            return Err(Error::invalid_config("max_neighbor_attempts must be positive"));
        }
        Ok(())
    }
}
