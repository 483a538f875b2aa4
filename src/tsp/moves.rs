//! Structural moves that turn one tour into a neighbor.
//!
//! Every move works on a copy and leaves index 0 (the start node) in
//! place. A move that needs more positions than the tour has returns an
//! unchanged copy.

use rand::seq::{index, SliceRandom};
use rand::Rng;

use crate::graph::NodeIx;
use crate::problem::Tour;

/// The five neighbor-generating moves, drawn uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    /// Reverse the segment `[i, j]`.
    Inverse,
    /// Insert any node at any position after the start.
    Insert,
    /// Exchange two positions.
    Swap,
    /// Permute everything after the start.
    Shuffle,
    /// Double-bridge: exchange segments `[i, j]` and `[k, l]`.
    SwapRoutes,
}

impl Move {
    pub const ALL: [Move; 5] = [
        Move::Inverse,
        Move::Insert,
        Move::Swap,
        Move::Shuffle,
        Move::SwapRoutes,
    ];

    /// Picks a move uniformly at random.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Applies the move to `tour`. `node_count` bounds the nodes `Insert`
    /// may draw from.
    pub fn apply<R: Rng>(self, tour: &[NodeIx], node_count: usize, rng: &mut R) -> Tour {
        match self {
            Move::Inverse => inverse(tour, rng),
            Move::Insert => insert(tour, node_count, rng),
            Move::Swap => swap(tour, rng),
            Move::Shuffle => shuffle(tour, rng),
            Move::SwapRoutes => swap_routes(tour, rng),
        }
    }
}

/// `k` distinct sorted positions from `1..len`, or `None` if too few exist.
fn sorted_positions<R: Rng>(len: usize, k: usize, rng: &mut R) -> Option<Vec<usize>> {
    if len < k + 1 {
        return None;
    }
    let mut picked: Vec<usize> = index::sample(rng, len - 1, k)
        .into_iter()
        .map(|i| i + 1)
        .collect();
    picked.sort_unstable();
    Some(picked)
}

pub fn inverse<R: Rng>(tour: &[NodeIx], rng: &mut R) -> Tour {
    let mut route = tour.to_vec();
    if let Some(p) = sorted_positions(route.len(), 2, rng) {
        route[p[0]..=p[1]].reverse();
    }
    route
}

/// May introduce a repeated node, which lets a tour pass through a hub
/// to reach otherwise unconnected parts of the graph.
pub fn insert<R: Rng>(tour: &[NodeIx], node_count: usize, rng: &mut R) -> Tour {
    let mut route = tour.to_vec();
    if node_count == 0 {
        return route;
    }
    let node = rng.random_range(0..node_count);
    let position = if route.is_empty() {
        0
    } else {
        rng.random_range(1..=route.len())
    };
    route.insert(position, node);
    route
}

pub fn swap<R: Rng>(tour: &[NodeIx], rng: &mut R) -> Tour {
    let mut route = tour.to_vec();
    if let Some(p) = sorted_positions(route.len(), 2, rng) {
        route.swap(p[0], p[1]);
    }
    route
}

pub fn shuffle<R: Rng>(tour: &[NodeIx], rng: &mut R) -> Tour {
    let mut route = tour.to_vec();
    if route.len() > 2 {
        route[1..].shuffle(rng);
    }
    route
}

/// Reassembles as `[..i] + [k..=l] + [j+1..k] + [i..=j] + [l+1..]`.
pub fn swap_routes<R: Rng>(tour: &[NodeIx], rng: &mut R) -> Tour {
    let Some(p) = sorted_positions(tour.len(), 4, rng) else {
        return tour.to_vec();
    };
    let (i, j, k, l) = (p[0], p[1], p[2], p[3]);

    let mut route = Vec::with_capacity(tour.len());
    route.extend_from_slice(&tour[..i]);
    route.extend_from_slice(&tour[k..=l]);
    route.extend_from_slice(&tour[j + 1..k]);
    route.extend_from_slice(&tour[i..=j]);
    route.extend_from_slice(&tour[l + 1..]);
    route
}
