//! Battery-constrained decorator over any graph routing problem.

use rand::Rng;

use super::config::BatteryConfig;
use crate::error::Result;
use crate::graph::{DistanceGraph, NodeIx};
use crate::problem::{GraphProblem, Problem, Tour};
use crate::tsp::cyclic_hops;

/// A hop that would have run the battery below zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Depleted {
    /// Index of the failing hop (0 is the hop leaving the start node).
    pub hop: usize,
    /// Charge left before the hop.
    pub level: f64,
    /// Distance of the hop.
    pub distance: f64,
}

/// Wraps a routing problem with a depleting battery.
///
/// Each hop drains its distance from the battery; touching a charging
/// station at either end of a hop refills it to capacity. A state whose
/// open path would run the battery negative is invalid, and any tour
/// that does so on a charged hop (the closing hop included) costs
/// `f64::INFINITY`. Everything else is delegated to the wrapped problem.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_tour::ev::{BatteryConfig, BatteryConstrained};
/// use u_tour::graph::{DistanceGraph, Edge};
/// use u_tour::problem::Problem;
/// use u_tour::tsp::RoutingProblem;
///
/// let edges = vec![
///     Edge::new("A", "ChargingStationB", 6.0),
///     Edge::new("ChargingStationB", "C", 6.0),
/// ];
/// let graph = Arc::new(DistanceGraph::with_start(&edges, "A").unwrap());
/// let base = RoutingProblem::new(graph.clone()).unwrap();
/// let ev = BatteryConstrained::new(base, BatteryConfig::default().with_capacity(10.0)).unwrap();
///
/// let tour = graph.tour_from_names(&["A", "ChargingStationB", "C"]).unwrap();
/// assert!(ev.validate(&tour));
/// ```
#[derive(Debug, Clone)]
pub struct BatteryConstrained<P> {
    inner: P,
    config: BatteryConfig,
    stations: Vec<bool>,
}

impl<P: GraphProblem> BatteryConstrained<P> {
    pub fn new(inner: P, config: BatteryConfig) -> Result<Self> {
        config.validate()?;
        let graph = inner.graph();
        let stations = graph
            .nodes()
            .map(|ix| graph.name(ix).starts_with(&config.station_prefix))
            .collect();
        Ok(Self {
            inner,
            config,
            stations,
        })
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn config(&self) -> &BatteryConfig {
        &self.config
    }

    pub fn is_charging_station(&self, node: NodeIx) -> bool {
        self.stations.get(node).copied().unwrap_or(false)
    }

    /// Battery level after each hop of the open path, after any recharge.
    ///
    /// Hops without an edge are reported as depleted with an infinite
    /// distance.
    pub fn battery_levels(&self, tour: &[NodeIx]) -> std::result::Result<Vec<f64>, Depleted> {
        let graph = self.inner.graph();
        let hops = tour.windows(2).map(|w| {
            let d = graph.distance(w[0], w[1]).unwrap_or(f64::INFINITY);
            (w[0], w[1], d)
        });
        self.drain(hops)
    }

    fn drain(
        &self,
        hops: impl Iterator<Item = (NodeIx, NodeIx, f64)>,
    ) -> std::result::Result<Vec<f64>, Depleted> {
        let mut level = self.config.capacity;
        let mut levels = Vec::new();
        for (hop, (from, to, distance)) in hops.enumerate() {
            if level - distance < 0.0 {
                return Err(Depleted {
                    hop,
                    level,
                    distance,
                });
            }
            level -= distance;
            if self.is_charging_station(from) || self.is_charging_station(to) {
                level = self.config.capacity;
            }
            levels.push(level);
        }
        Ok(levels)
    }

    /// Whether the cyclic walk priced by `cost` keeps the battery non-negative.
    /// Missing edges are skipped; the wrapped cost already penalizes them.
    fn cyclic_feasible(&self, tour: &[NodeIx]) -> bool {
        let graph = self.inner.graph();
        let hops = cyclic_hops(tour)
            .filter_map(|(a, b)| graph.distance(a, b).map(|d| (a, b, d)));
        self.drain(hops).is_ok()
    }
}

impl<P: GraphProblem> Problem for BatteryConstrained<P> {
    type State = Tour;

    fn initial_state<R: Rng>(&mut self, rng: &mut R) -> Tour {
        self.inner.initial_state(rng)
    }

    fn current_state(&self) -> &Tour {
        self.inner.current_state()
    }

    fn set_current_state(&mut self, state: Tour) {
        self.inner.set_current_state(state);
    }

    fn random_neighbor<R: Rng>(&mut self, current: &Tour, rng: &mut R) -> Tour {
        for _ in 0..self.config.max_neighbor_attempts {
            let candidate = self.inner.random_neighbor(current, rng);
            if self.validate(&candidate) {
                return candidate;
            }
        }
        log::trace!(
            "no battery-feasible neighbor within {} attempts; keeping current tour",
            self.config.max_neighbor_attempts
        );
        current.clone()
    }

    fn validate(&self, state: &Tour) -> bool {
        self.inner.validate(state) && self.battery_levels(state).is_ok()
    }

    fn is_solution(&self, state: &Tour) -> bool {
        self.inner.is_solution(state)
    }

    fn cost(&self, state: &Tour) -> f64 {
        if self.cyclic_feasible(state) {
            self.inner.cost(state)
        } else {
            f64::INFINITY
        }
    }

    fn heuristic(&self, state: &Tour) -> f64 {
        self.inner.heuristic(state)
    }
}

impl<P: GraphProblem> GraphProblem for BatteryConstrained<P> {
    fn graph(&self) -> &DistanceGraph {
        self.inner.graph()
    }
}
