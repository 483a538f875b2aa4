//! Random instance generation.

use rand::Rng;

use super::edge::Edge;
use crate::error::{Error, Result};

/// Upper bound on regeneration rounds before giving up.
const MAX_ATTEMPTS: usize = 1000;

/// Largest integer distance drawn for a generated edge.
const MAX_DISTANCE: u32 = 10;

/// Generates a random symmetric edge list over nodes `l1..ln`.
///
/// Each unordered pair is connected with probability `density`, with an
/// integer distance in `1..=10`. The draw is repeated until no node is
/// left without edges.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] for `n < 2` or `density` outside
/// `(0, 1]`, or when every attempt leaves some node isolated.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use u_tour::graph::{random_edges, DistanceGraph};
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(7);
/// let edges = random_edges(8, 0.7, &mut rng).unwrap();
/// let graph = DistanceGraph::with_start(&edges, "l1").unwrap();
/// assert_eq!(graph.node_count(), 8);
/// ```
pub fn random_edges<R: Rng>(n: usize, density: f64, rng: &mut R) -> Result<Vec<Edge>> {
    if n < 2 {
        return Err(Error::invalid_parameter(format!(
            "need at least 2 nodes, got {n}"
        )));
    }
    if !(density > 0.0 && density <= 1.0) {
        return Err(Error::invalid_parameter(format!(
            "density must be in (0, 1], got {density}"
        )));
    }

    for attempt in 0..MAX_ATTEMPTS {
        let mut degree = vec![0usize; n];
        let mut edges = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                if rng.random_range(0.0..1.0) < density {
                    let distance = rng.random_range(1..=MAX_DISTANCE) as f64;
                    edges.push(Edge::new(label(i), label(j), distance));
                    degree[i] += 1;
                    degree[j] += 1;
                }
            }
        }
        if degree.iter().all(|&d| d > 0) {
            log::debug!(
                "generated {} edges over {n} nodes after {} attempt(s)",
                edges.len(),
                attempt + 1
            );
            return Ok(edges);
        }
    }

    Err(Error::invalid_parameter(format!(
        "could not generate a graph without isolated nodes (n={n}, density={density})"
    )))
}

fn label(i: usize) -> String {
    format!("l{}", i + 1)
}
