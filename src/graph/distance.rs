//! Symmetric distance lookup over named locations.

use std::collections::{HashMap, HashSet};

use super::edge::Edge;
use crate::error::{Error, Result};

/// Dense index of a node inside a [`DistanceGraph`].
pub type NodeIx = usize;

/// An immutable, undirected distance graph.
///
/// Node identifiers are interned into dense indices. When a start node is
/// designated it always receives index 0; every other node follows in the
/// order it first appeared during construction.
///
/// Absent edges are not errors: [`distance`](Self::distance) returns `None`
/// and callers treat that as "not connected".
///
/// # Examples
///
/// ```
/// use u_tour::graph::{DistanceGraph, Edge};
///
/// let edges = vec![
///     Edge::new("l1", "l2", 5.0),
///     Edge::new("l2", "l3", 6.0),
/// ];
/// let graph = DistanceGraph::with_start(&edges, "l2").unwrap();
/// assert_eq!(graph.name(0), "l2");
/// assert_eq!(graph.distance_by_name("l3", "l2"), Some(6.0));
/// assert_eq!(graph.distance_by_name("l1", "l3"), None);
/// ```
#[derive(Debug, Clone)]
pub struct DistanceGraph {
    names: Vec<String>,
    index: HashMap<String, NodeIx>,
    matrix: Vec<Option<f64>>,
    adjacency: Vec<Vec<NodeIx>>,
    start: Option<NodeIx>,
    edge_count: usize,
}

impl DistanceGraph {
    /// Returns a builder for graphs with a start node or isolated nodes.
    pub fn builder() -> GraphBuilder {
        GraphBuilder::default()
    }

    /// Builds a graph from an edge list with no designated start node.
    pub fn from_edges(edges: &[Edge]) -> Result<Self> {
        Self::builder().edges(edges.iter().cloned()).build()
    }

    /// Builds a graph from an edge list, placing `start` at index 0.
    pub fn with_start(edges: &[Edge], start: &str) -> Result<Self> {
        Self::builder()
            .start(start)
            .edges(edges.iter().cloned())
            .build()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    /// Number of distinct undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// All node indices, start node first when one is designated.
    pub fn nodes(&self) -> std::ops::Range<NodeIx> {
        0..self.names.len()
    }

    /// The designated start node, if any.
    pub fn start(&self) -> Option<NodeIx> {
        self.start
    }

    /// Name of the node at `ix`.
    ///
    /// # Panics
    ///
    /// Panics if `ix` is out of bounds.
    pub fn name(&self, ix: NodeIx) -> &str {
        &self.names[ix]
    }

    pub fn index_of(&self, name: &str) -> Option<NodeIx> {
        self.index.get(name).copied()
    }

    /// Translates a tour of indices back into node names.
    pub fn names(&self, tour: &[NodeIx]) -> Vec<&str> {
        tour.iter().map(|&ix| self.name(ix)).collect()
    }

    /// Translates node names into a tour of indices.
    pub fn tour_from_names<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<NodeIx>> {
        names
            .iter()
            .map(|n| {
                self.index_of(n.as_ref())
                    .ok_or_else(|| Error::UnknownNode(n.as_ref().to_string()))
            })
            .collect()
    }

    /// Distance between `a` and `b` in either direction, `None` if unconnected.
    pub fn distance(&self, a: NodeIx, b: NodeIx) -> Option<f64> {
        let n = self.names.len();
        if a >= n || b >= n {
            return None;
        }
        self.matrix[a * n + b]
    }

    pub fn distance_by_name(&self, a: &str, b: &str) -> Option<f64> {
        self.distance(self.index_of(a)?, self.index_of(b)?)
    }

    pub fn is_connected(&self, a: NodeIx, b: NodeIx) -> bool {
        self.distance(a, b).is_some()
    }

    /// Nodes directly connected to `ix`.
    pub fn neighbors(&self, ix: NodeIx) -> &[NodeIx] {
        self.adjacency.get(ix).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn degree(&self, ix: NodeIx) -> usize {
        self.neighbors(ix).len()
    }
}

/// Incremental constructor for [`DistanceGraph`].
///
/// Validation happens in [`build`](Self::build): malformed edges, an unknown
/// start node and an empty node set are all rejected there.
///
/// # Examples
///
/// ```
/// use u_tour::graph::DistanceGraph;
///
/// let graph = DistanceGraph::builder()
///     .start("Hub")
///     .edge("Hub", "A", 3.0)
///     .node("Island")
///     .build()
///     .unwrap();
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.degree(graph.index_of("Island").unwrap()), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    start: Option<String>,
    order: Vec<String>,
    seen: HashSet<String>,
    edges: Vec<Edge>,
}

impl GraphBuilder {
    pub fn start(mut self, name: impl Into<String>) -> Self {
        self.start = Some(name.into());
        self
    }

    /// Declares a node, which may remain without edges.
    pub fn node(mut self, name: impl Into<String>) -> Self {
        self.remember(name.into());
        self
    }

    pub fn edge(self, start: impl Into<String>, end: impl Into<String>, distance: f64) -> Self {
        self.edges(std::iter::once(Edge::new(start, end, distance)))
    }

    pub fn edges(mut self, edges: impl IntoIterator<Item = Edge>) -> Self {
        for edge in edges {
            self.remember(edge.start.clone());
            self.remember(edge.end.clone());
            self.edges.push(edge);
        }
        self
    }

    fn remember(&mut self, name: String) {
        if self.seen.insert(name.clone()) {
            self.order.push(name);
        }
    }

    pub fn build(self) -> Result<DistanceGraph> {
        for edge in &self.edges {
            edge.validate()?;
        }
        if self.order.iter().any(|n| n.is_empty()) {
            return Err(Error::invalid_parameter("node identifiers must not be empty"));
        }
        if self.order.is_empty() {
            return Err(Error::EmptyGraph);
        }

        let mut names = self.order;
        let start = match self.start {
            Some(start) => {
                let pos = names
                    .iter()
                    .position(|n| *n == start)
                    .ok_or_else(|| Error::UnknownNode(start.clone()))?;
                let name = names.remove(pos);
                names.insert(0, name);
                Some(0)
            }
            None => None,
        };

        let index: HashMap<String, NodeIx> = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();

        let n = names.len();
        let mut matrix = vec![None; n * n];
        let mut adjacency = vec![Vec::new(); n];
        let mut edge_count = 0;

        for edge in &self.edges {
            let a = index[&edge.start];
            let b = index[&edge.end];
            if matrix[a * n + b].is_none() {
                adjacency[a].push(b);
                adjacency[b].push(a);
                edge_count += 1;
            }
            // Duplicate pairs: last write wins.
            matrix[a * n + b] = Some(edge.distance);
            matrix[b * n + a] = Some(edge.distance);
        }

        log::debug!(
            "built distance graph: {} nodes, {} edges, start={:?}",
            n,
            edge_count,
            start.map(|s: NodeIx| names[s].as_str())
        );

        Ok(DistanceGraph {
            names,
            index,
            matrix,
            adjacency,
            start,
            edge_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle_edges() -> Vec<Edge> {
        vec![
            Edge::new("l1", "l2", 5.0),
            Edge::new("l2", "l3", 6.0),
            Edge::new("l3", "l4", 7.0),
            Edge::new("l4", "l1", 8.0),
        ]
    }

    #[test]
    fn test_symmetric_lookup() {
        let g = DistanceGraph::from_edges(&cycle_edges()).unwrap();
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.edge_count(), 4);
        assert_eq!(g.distance_by_name("l1", "l2"), Some(5.0));
        assert_eq!(g.distance_by_name("l2", "l1"), Some(5.0));
        assert_eq!(g.distance_by_name("l1", "l3"), None);
        assert_eq!(g.start(), None);
    }

    #[test]
    fn test_start_node_forced_first() {
        let g = DistanceGraph::with_start(&cycle_edges(), "l3").unwrap();
        assert_eq!(g.name(0), "l3");
        assert_eq!(g.start(), Some(0));
        let names: Vec<&str> = g.nodes().map(|ix| g.name(ix)).collect();
        assert_eq!(names, vec!["l3", "l1", "l2", "l4"]);
    }

    #[test]
    fn test_unknown_start_rejected() {
        let err = DistanceGraph::with_start(&cycle_edges(), "nowhere").unwrap_err();
        assert_eq!(err, Error::UnknownNode("nowhere".into()));
    }

    #[test]
    fn test_empty_graph_rejected() {
        assert_eq!(
            DistanceGraph::from_edges(&[]).unwrap_err(),
            Error::EmptyGraph
        );
    }

    #[test]
    fn test_invalid_edge_rejected() {
        let edges = vec![Edge::new("a", "b", 1.0), Edge::new("b", "c", -2.0)];
        assert!(matches!(
            DistanceGraph::from_edges(&edges),
            Err(Error::InvalidEdge { .. })
        ));
    }

    #[test]
    fn test_duplicate_edge_last_write_wins() {
        let edges = vec![Edge::new("a", "b", 1.0), Edge::new("b", "a", 4.0)];
        let g = DistanceGraph::from_edges(&edges).unwrap();
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.distance_by_name("a", "b"), Some(4.0));
        assert_eq!(g.degree(g.index_of("a").unwrap()), 1);
    }

    #[test]
    fn test_neighbors_and_isolated_node() {
        let g = DistanceGraph::builder()
            .edges(cycle_edges())
            .node("l5")
            .build()
            .unwrap();
        let l1 = g.index_of("l1").unwrap();
        let mut nbrs: Vec<&str> = g.neighbors(l1).iter().map(|&ix| g.name(ix)).collect();
        nbrs.sort_unstable();
        assert_eq!(nbrs, vec!["l2", "l4"]);
        assert!(g.neighbors(g.index_of("l5").unwrap()).is_empty());
        assert!(g.neighbors(99).is_empty());
        assert_eq!(g.distance(0, 99), None);
    }

    #[test]
    fn test_name_translation_round_trip() {
        let g = DistanceGraph::with_start(&cycle_edges(), "l1").unwrap();
        let tour = g.tour_from_names(&["l1", "l2", "l3"]).unwrap();
        assert_eq!(g.names(&tour), vec!["l1", "l2", "l3"]);
        assert!(g.tour_from_names(&["l1", "zz"]).is_err());
    }
}
