//! Centrality-guided routing problem.

use std::sync::Arc;

use rand::seq::IndexedRandom;
use rand::Rng;

use super::config::CentralityConfig;
use super::memory::ShortTermMemory;
use super::table::{score_of, CentralityMetric, CentralityTable};
use crate::error::{Error, Result};
use crate::graph::{DistanceGraph, NodeIx};
use crate::problem::{GraphProblem, Problem, Tour};
use crate::tsp::{is_connected_route, tour_cost, uncovered, RoutingConfig};

/// Grows a partial path greedily toward central, unvisited nodes.
///
/// Each neighbor extends the path by one node adjacent to its last node.
/// A metric is drawn at random from those the table provides; among
/// adjacent nodes not in short-term memory the one maximizing
/// `score - visits * revisit_penalty` is appended. When no adjacent node
/// is admissible the path comes back unchanged.
///
/// Initial states are random walks from the start node covering about
/// `initial_walk_fraction` of the node count. Both the walk and every
/// extension feed the short-term memory, which is reset per initial state.
#[derive(Debug, Clone)]
pub struct CentralityRouting {
    graph: Arc<DistanceGraph>,
    start: NodeIx,
    scores: Arc<Vec<[f64; 4]>>,
    metrics: Vec<CentralityMetric>,
    config: CentralityConfig,
    routing: RoutingConfig,
    memory: ShortTermMemory,
    current: Tour,
}

impl CentralityRouting {
    pub fn new(graph: Arc<DistanceGraph>, table: &CentralityTable) -> Result<Self> {
        Self::with_config(
            graph,
            table,
            CentralityConfig::default(),
            RoutingConfig::default(),
        )
    }

    pub fn with_config(
        graph: Arc<DistanceGraph>,
        table: &CentralityTable,
        config: CentralityConfig,
        routing: RoutingConfig,
    ) -> Result<Self> {
        config.validate()?;
        routing.validate()?;
        let metrics = table.metrics();
        if metrics.is_empty() {
            return Err(Error::invalid_parameter("centrality table holds no scores"));
        }
        let start = graph.start().unwrap_or(0);
        let scores = Arc::new(table.resolve(&graph));
        Ok(Self {
            memory: ShortTermMemory::new(config.memory_capacity),
            current: vec![start],
            graph,
            start,
            scores,
            metrics,
            config,
            routing,
        })
    }

    pub fn start(&self) -> NodeIx {
        self.start
    }

    pub fn memory(&self) -> &ShortTermMemory {
        &self.memory
    }

    /// The best admissible extension of `path` under `metric`, if any.
    pub fn best_extension(&self, path: &[NodeIx], metric: CentralityMetric) -> Option<NodeIx> {
        let last = *path.last()?;
        let mut best: Option<(NodeIx, f64)> = None;
        for &candidate in self.graph.neighbors(last) {
            if self.memory.contains(candidate) {
                continue;
            }
            let visits = path.iter().filter(|&&n| n == candidate).count() as f64;
            let score =
                score_of(&self.scores[candidate], metric) - visits * self.config.revisit_penalty;
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((candidate, score));
            }
        }
        best.map(|(n, _)| n)
    }

    fn walk_length(&self) -> usize {
        let n = self.graph.node_count() as f64;
        ((n * self.config.initial_walk_fraction).ceil() as usize).max(1)
    }
}

impl Problem for CentralityRouting {
    type State = Tour;

    fn initial_state<R: Rng>(&mut self, rng: &mut R) -> Tour {
        self.memory.clear();
        let target = self.walk_length();
        let mut path = vec![self.start];
        self.memory.remember(self.start);
        while path.len() < target {
            let last = path[path.len() - 1];
            let Some(&next) = self.graph.neighbors(last).choose(rng) else {
                break;
            };
            path.push(next);
            self.memory.remember(next);
        }
        path
    }

    fn current_state(&self) -> &Tour {
        &self.current
    }

    fn set_current_state(&mut self, state: Tour) {
        self.current = state;
    }

    fn random_neighbor<R: Rng>(&mut self, current: &Tour, rng: &mut R) -> Tour {
        let metric = self.metrics[rng.random_range(0..self.metrics.len())];
        match self.best_extension(current, metric) {
            Some(next) => {
                self.memory.remember(next);
                let mut path = current.clone();
                path.push(next);
                path
            }
            None => current.clone(),
        }
    }

    fn validate(&self, state: &Tour) -> bool {
        is_connected_route(&self.graph, state)
    }

    fn is_solution(&self, state: &Tour) -> bool {
        uncovered(&self.graph, state) == 0
    }

    fn cost(&self, state: &Tour) -> f64 {
        tour_cost(&self.graph, state, &self.routing)
    }

    fn heuristic(&self, state: &Tour) -> f64 {
        uncovered(&self.graph, state) as f64
    }
}

impl GraphProblem for CentralityRouting {
    fn graph(&self) -> &DistanceGraph {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Edge;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Star around `hub` with a tail `c - d`.
    fn star() -> (Arc<DistanceGraph>, CentralityTable) {
        let edges = vec![
            Edge::new("hub", "a", 1.0),
            Edge::new("hub", "b", 1.0),
            Edge::new("hub", "c", 1.0),
            Edge::new("c", "d", 1.0),
        ];
        let g = Arc::new(DistanceGraph::with_start(&edges, "hub").unwrap());
        let mut table = CentralityTable::new();
        table.insert("hub", CentralityMetric::PageRank, 5.0);
        table.insert("a", CentralityMetric::PageRank, 1.0);
        table.insert("b", CentralityMetric::PageRank, 3.0);
        table.insert("c", CentralityMetric::PageRank, 2.0);
        table.insert("d", CentralityMetric::PageRank, 0.5);
        (g, table)
    }

    fn ix(g: &DistanceGraph, name: &str) -> NodeIx {
        g.index_of(name).unwrap()
    }

    #[test]
    fn test_empty_table_rejected() {
        let (g, _) = star();
        assert!(CentralityRouting::new(g, &CentralityTable::new()).is_err());
    }

    #[test]
    fn test_picks_highest_score_outside_memory() {
        let (g, table) = star();
        let mut p = CentralityRouting::new(Arc::clone(&g), &table).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let path = vec![ix(&g, "hub")];
        let next = p.random_neighbor(&path, &mut rng);
        assert_eq!(next, vec![ix(&g, "hub"), ix(&g, "b")]);
        assert!(p.memory().contains(ix(&g, "b")));

        // b is now remembered, so the same path extends to c next.
        let again = p.random_neighbor(&path, &mut rng);
        assert_eq!(again.last(), Some(&ix(&g, "c")));
    }

    #[test]
    fn test_revisit_penalty_discourages_frequent_nodes() {
        let (g, table) = star();
        let p = CentralityRouting::with_config(
            Arc::clone(&g),
            &table,
            CentralityConfig::default()
                .with_memory_capacity(0)
                .with_revisit_penalty(2.5),
            RoutingConfig::default(),
        )
        .unwrap();
        let hub = ix(&g, "hub");
        let b = ix(&g, "b");
        let c = ix(&g, "c");
        // b: 3.0 - 1 * 2.5 = 0.5; c: 2.0 - 0 = 2.0
        let path = vec![hub, b, hub];
        assert_eq!(p.best_extension(&path, CentralityMetric::PageRank), Some(c));
    }

    #[test]
    fn test_stall_returns_unchanged_path() {
        let (g, table) = star();
        let mut p = CentralityRouting::with_config(
            Arc::clone(&g),
            &table,
            CentralityConfig::default().with_memory_capacity(1),
            RoutingConfig::default(),
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        // From a, the only neighbor is hub; remembering hub blocks it.
        let path = vec![ix(&g, "hub"), ix(&g, "a")];
        p.memory.remember(ix(&g, "hub"));
        assert_eq!(p.random_neighbor(&path, &mut rng), path);
    }

    #[test]
    fn test_initial_walk_is_connected_and_bounded() {
        let (g, table) = star();
        let mut p = CentralityRouting::new(Arc::clone(&g), &table).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let s = p.initial_state(&mut rng);
            assert_eq!(s[0], p.start());
            assert_eq!(s.len(), 3); // ceil(5 * 0.5)
            assert!(p.validate(&s));
        }
    }

    #[test]
    fn test_extensions_stay_connected() {
        let (g, table) = star();
        let mut p = CentralityRouting::new(Arc::clone(&g), &table).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let mut path = p.initial_state(&mut rng);
        for _ in 0..15 {
            path = p.random_neighbor(&path, &mut rng);
            assert!(p.validate(&path));
        }
    }
}
