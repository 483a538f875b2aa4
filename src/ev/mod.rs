//! Electric-vehicle routing with a depleting battery.
//!
//! [`BatteryConstrained`] decorates any [`GraphProblem`](crate::problem::GraphProblem)
//! by composition: it overrides validation and cost, and delegates the rest.

mod battery;
mod config;

pub use battery::{BatteryConstrained, Depleted};
pub use config::BatteryConfig;
