//! Centrality-guided path extension.
//!
//! Instead of permuting a full tour, this variant grows a partial path one
//! node at a time, biased toward nodes with high externally supplied
//! centrality (pagerank, degree, closeness, clustering) and away from
//! nodes it has just visited.

mod config;
mod memory;
mod problem;
mod table;

pub use config::CentralityConfig;
pub use memory::ShortTermMemory;
pub use problem::CentralityRouting;
pub use table::{CentralityMetric, CentralityRecord, CentralityTable};
