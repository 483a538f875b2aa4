//! Route scoring and structural checks shared by the routing variants.

use super::config::RoutingConfig;
use crate::graph::{DistanceGraph, NodeIx};

/// Hops charged when walking `tour` as a cycle.
///
/// The closing hop back to the first node is included unless the tour
/// already ends on its first node. Tours shorter than two nodes have no
/// hops.
pub fn cyclic_hops(tour: &[NodeIx]) -> impl Iterator<Item = (NodeIx, NodeIx)> + '_ {
    let closing = match (tour.first(), tour.last()) {
        (Some(&first), Some(&last)) if tour.len() >= 2 && first != last => Some((last, first)),
        _ => None,
    };
    tour.windows(2).map(|w| (w[0], w[1])).chain(closing)
}

/// Every consecutive pair is an edge. The closing hop is not checked.
pub fn is_connected_route(graph: &DistanceGraph, tour: &[NodeIx]) -> bool {
    tour.windows(2).all(|w| graph.is_connected(w[0], w[1]))
}

/// Marks the nodes `tour` visits.
pub fn visited(graph: &DistanceGraph, tour: &[NodeIx]) -> Vec<bool> {
    let mut seen = vec![false; graph.node_count()];
    for &ix in tour {
        if let Some(slot) = seen.get_mut(ix) {
            *slot = true;
        }
    }
    seen
}

/// Number of graph nodes `tour` never visits.
pub fn uncovered(graph: &DistanceGraph, tour: &[NodeIx]) -> usize {
    visited(graph, tour).iter().filter(|&&v| !v).count()
}

/// Lower-is-better tour cost.
///
/// Sums edge distances over the cyclic walk, charging
/// `missing_edge_penalty` for each hop without an edge, then adds
/// `missing_node_penalty` for each node never visited. Malformed tours
/// stay finite and comparable so the search can climb out of them.
///
/// # Examples
///
/// ```
/// use u_tour::graph::{DistanceGraph, Edge};
/// use u_tour::tsp::{tour_cost, RoutingConfig};
///
/// let edges = vec![
///     Edge::new("a", "b", 1.0),
///     Edge::new("b", "c", 2.0),
///     Edge::new("c", "a", 3.0),
/// ];
/// let graph = DistanceGraph::with_start(&edges, "a").unwrap();
/// let tour = graph.tour_from_names(&["a", "b", "c"]).unwrap();
/// assert_eq!(tour_cost(&graph, &tour, &RoutingConfig::default()), 6.0);
/// ```
pub fn tour_cost(graph: &DistanceGraph, tour: &[NodeIx], config: &RoutingConfig) -> f64 {
    let travelled: f64 = cyclic_hops(tour)
        .map(|(a, b)| graph.distance(a, b).unwrap_or(config.missing_edge_penalty))
        .sum();
    travelled + uncovered(graph, tour) as f64 * config.missing_node_penalty
}
