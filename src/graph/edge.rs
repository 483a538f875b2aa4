//! Edge records as supplied by the caller.

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An undirected, weighted connection between two named locations.
///
/// This is the ingestion format: a flat list of `{start, end, distance}`
/// records, typically fetched from a graph store by the caller.
///
/// # Examples
///
/// ```
/// use u_tour::graph::Edge;
///
/// let edge = Edge::new("Hub", "Location1", 10.0);
/// assert!(edge.validate().is_ok());
/// assert!(Edge::new("Hub", "Hub", 1.0).validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Edge {
    /// One endpoint.
    pub start: String,
    /// The other endpoint.
    pub end: String,
    /// Travel distance. Must be finite and strictly positive.
    pub distance: f64,
}

impl Edge {
    pub fn new(start: impl Into<String>, end: impl Into<String>, distance: f64) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            distance,
        }
    }

    /// Rejects self-loops, empty identifiers and non-positive distances.
    pub fn validate(&self) -> Result<()> {
        if self.start.is_empty() || self.end.is_empty() {
            return Err(Error::invalid_edge(
                &self.start,
                &self.end,
                "node identifiers must not be empty",
            ));
        }
        if self.start == self.end {
            return Err(Error::invalid_edge(&self.start, &self.end, "self-loop"));
        }
        if !self.distance.is_finite() || self.distance <= 0.0 {
            return Err(Error::invalid_edge(
                &self.start,
                &self.end,
                format!("distance must be positive and finite, got {}", self.distance),
            ));
        }
        Ok(())
    }
}
