//! Externally supplied per-node centrality scores.

use std::collections::HashMap;

use crate::graph::{DistanceGraph, NodeIx};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A named centrality measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CentralityMetric {
    PageRank,
    Degree,
    Closeness,
    Clustering,
}

impl CentralityMetric {
    pub const ALL: [CentralityMetric; 4] = [
        CentralityMetric::PageRank,
        CentralityMetric::Degree,
        CentralityMetric::Closeness,
        CentralityMetric::Clustering,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

/// One row of a centrality export: a node name and any of its scores.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CentralityRecord {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub pagerank: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub degree: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub closeness: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub clustering: Option<f64>,
}

/// Per-node scores keyed by node name.
///
/// # Examples
///
/// ```
/// use u_tour::centrality::{CentralityMetric, CentralityTable};
///
/// let mut table = CentralityTable::new();
/// table.insert("Hub", CentralityMetric::PageRank, 0.8);
/// assert_eq!(table.score("Hub", CentralityMetric::PageRank), Some(0.8));
/// assert_eq!(table.score("Hub", CentralityMetric::Degree), None);
/// assert_eq!(table.metrics(), vec![CentralityMetric::PageRank]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CentralityTable {
    scores: HashMap<String, [Option<f64>; 4]>,
}

impl CentralityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from exported rows. Later rows overwrite earlier
    /// scores for the same node and metric.
    pub fn from_records(records: impl IntoIterator<Item = CentralityRecord>) -> Self {
        let mut table = Self::new();
        for r in records {
            let fields = [
                (CentralityMetric::PageRank, r.pagerank),
                (CentralityMetric::Degree, r.degree),
                (CentralityMetric::Closeness, r.closeness),
                (CentralityMetric::Clustering, r.clustering),
            ];
            for (metric, value) in fields {
                if let Some(v) = value {
                    table.insert(r.name.clone(), metric, v);
                }
            }
        }
        table
    }

    /// Fills the degree metric from the graph's own adjacency.
    pub fn with_degree(mut self, graph: &DistanceGraph) -> Self {
        for ix in graph.nodes() {
            self.insert(graph.name(ix), CentralityMetric::Degree, graph.degree(ix) as f64);
        }
        self
    }

    pub fn insert(&mut self, node: impl Into<String>, metric: CentralityMetric, score: f64) {
        self.scores.entry(node.into()).or_default()[metric.slot()] = Some(score);
    }

    pub fn score(&self, node: &str, metric: CentralityMetric) -> Option<f64> {
        self.scores.get(node).and_then(|s| s[metric.slot()])
    }

    pub fn is_empty(&self) -> bool {
        self.metrics().is_empty()
    }

    /// Metrics with at least one score, in [`CentralityMetric::ALL`] order.
    pub fn metrics(&self) -> Vec<CentralityMetric> {
        CentralityMetric::ALL
            .into_iter()
            .filter(|m| self.scores.values().any(|s| s[m.slot()].is_some()))
            .collect()
    }

    /// Dense score rows indexed by node; absent scores read as zero.
    pub(crate) fn resolve(&self, graph: &DistanceGraph) -> Vec<[f64; 4]> {
        graph
            .nodes()
            .map(|ix: NodeIx| {
                let mut row = [0.0; 4];
                if let Some(s) = self.scores.get(graph.name(ix)) {
                    for (slot, v) in row.iter_mut().zip(s) {
                        *slot = v.unwrap_or(0.0);
                    }
                }
                row
            })
            .collect()
    }
}

/// Reads a score from a resolved row.
pub(crate) fn score_of(row: &[f64; 4], metric: CentralityMetric) -> f64 {
    row[metric.slot()]
}
