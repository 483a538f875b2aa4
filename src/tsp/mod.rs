//! Traveling-salesman routing over a distance graph.
//!
//! Tours may revisit nodes (so disconnected regions can be reached through
//! a hub) and are scored as cycles: total distance plus penalties for
//! missing edges and unvisited nodes. Lower cost is better.

mod config;
mod cost;
mod moves;
mod problem;

pub use config::RoutingConfig;
pub use cost::{cyclic_hops, is_connected_route, tour_cost, uncovered, visited};
pub use moves::{insert, inverse, shuffle, swap, swap_routes, Move};
pub use problem::RoutingProblem;
