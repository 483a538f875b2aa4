//! Random-move routing problem.

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;

use super::config::RoutingConfig;
use super::cost::{is_connected_route, tour_cost, uncovered};
use super::moves::Move;
use crate::error::Result;
use crate::graph::{DistanceGraph, Edge, NodeIx};
use crate::problem::{GraphProblem, Problem, Tour};

/// Tour search over a [`DistanceGraph`] using the five structural moves.
///
/// The start node is the graph's designated start (index 0 when one was
/// given). Initial states are the start followed by a random permutation
/// of every other node; neighbors are drawn by applying one random
/// [`Move`] and retrying until the result is a connected route.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use u_tour::graph::Edge;
/// use u_tour::problem::Problem;
/// use u_tour::tsp::RoutingProblem;
///
/// let edges = vec![
///     Edge::new("Hub", "A", 4.0),
///     Edge::new("A", "B", 2.0),
///     Edge::new("B", "Hub", 3.0),
/// ];
/// let mut problem = RoutingProblem::from_edges(&edges, "Hub").unwrap();
/// let mut rng = rand::rngs::StdRng::seed_from_u64(1);
/// let start = problem.initial_state(&mut rng);
/// assert_eq!(start[0], 0);
/// assert!(problem.is_solution(&start));
/// ```
#[derive(Debug, Clone)]
pub struct RoutingProblem {
    graph: Arc<DistanceGraph>,
    start: NodeIx,
    config: RoutingConfig,
    current: Tour,
}

impl RoutingProblem {
    /// Wraps a shared graph with default settings.
    pub fn new(graph: Arc<DistanceGraph>) -> Result<Self> {
        Self::with_config(graph, RoutingConfig::default())
    }

    pub fn with_config(graph: Arc<DistanceGraph>, config: RoutingConfig) -> Result<Self> {
        config.validate()?;
        let start = graph.start().unwrap_or(0);
        let current = std::iter::once(start)
            .chain(graph.nodes().filter(|&ix| ix != start))
            .collect();
        Ok(Self {
            graph,
            start,
            config,
            current,
        })
    }

    /// Builds the graph from `edges` with `start` as the start node.
    pub fn from_edges(edges: &[Edge], start: &str) -> Result<Self> {
        Self::new(Arc::new(DistanceGraph::with_start(edges, start)?))
    }

    pub fn start(&self) -> NodeIx {
        self.start
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Shared handle to the graph, for building sibling problems.
    pub fn shared_graph(&self) -> Arc<DistanceGraph> {
        Arc::clone(&self.graph)
    }

    /// One random move applied to `current`, without validation.
    pub fn propose<R: Rng>(&self, current: &[NodeIx], rng: &mut R) -> Tour {
        Move::random(rng).apply(current, self.graph.node_count(), rng)
    }
}

impl Problem for RoutingProblem {
    type State = Tour;

    fn initial_state<R: Rng>(&mut self, rng: &mut R) -> Tour {
        let mut rest: Vec<NodeIx> = self
            .graph
            .nodes()
            .filter(|&ix| ix != self.start)
            .collect();
        rest.shuffle(rng);
        std::iter::once(self.start).chain(rest).collect()
    }

    fn current_state(&self) -> &Tour {
        &self.current
    }

    fn set_current_state(&mut self, state: Tour) {
        self.current = state;
    }

    fn random_neighbor<R: Rng>(&mut self, current: &Tour, rng: &mut R) -> Tour {
        for _ in 0..self.config.max_neighbor_attempts {
            let candidate = self.propose(current, rng);
            if self.validate(&candidate) {
                return candidate;
            }
        }
        log::trace!(
            "no connected neighbor within {} attempts; keeping current tour",
            self.config.max_neighbor_attempts
        );
        current.clone()
    }

    fn validate(&self, state: &Tour) -> bool {
        is_connected_route(&self.graph, state)
    }

    fn is_solution(&self, state: &Tour) -> bool {
        uncovered(&self.graph, state) == 0
    }

    fn cost(&self, state: &Tour) -> f64 {
        tour_cost(&self.graph, state, &self.config)
    }

    /// Number of nodes still unvisited.
    fn heuristic(&self, state: &Tour) -> f64 {
        uncovered(&self.graph, state) as f64
    }
}

impl GraphProblem for RoutingProblem {
    fn graph(&self) -> &DistanceGraph {
        &self.graph
    }
}
