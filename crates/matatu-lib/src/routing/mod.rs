//! Point-to-point route planning.
//!
//! This module provides:
//! - [`RouteAlgorithm`] - closed set of supported algorithms
//! - [`RouteRequest`] - a single point-to-point query
//! - [`RoutePlan`] - the planned result handed to boundary layers
//! - [`plan_route`] - main entry point dispatching through a planner
//!
//! # Strategy pattern
//!
//! Algorithm dispatch goes through the [`RoutePlanner`] trait rather than
//! string comparison at call sites; each algorithm lives in its own planner
//! struct so new ones can be added without touching the orchestration.

mod planner;

pub use planner::{select_planner, AStarPlanner, DijkstraPlanner, RoutePlanner};

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::network::{Network, NodeId};
use crate::path::{Heuristic, SearchFilter};

/// Supported routing algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteAlgorithm {
    /// Dijkstra's algorithm.
    Dijkstra,
    /// A* search (heuristic guided).
    #[default]
    #[serde(rename = "a-star")]
    AStar,
}

impl fmt::Display for RouteAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteAlgorithm::Dijkstra => "dijkstra",
            RouteAlgorithm::AStar => "a-star",
        };
        f.write_str(value)
    }
}

impl FromStr for RouteAlgorithm {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "dijkstra" => Ok(RouteAlgorithm::Dijkstra),
            "astar" | "a-star" | "a_star" => Ok(RouteAlgorithm::AStar),
            other => Err(format!("unknown algorithm '{other}'")),
        }
    }
}

/// A single point-to-point routing query.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub start: NodeId,
    pub goal: NodeId,
    pub algorithm: RouteAlgorithm,
    /// Remaining-cost estimate used by A*; ignored by Dijkstra. The default
    /// zero heuristic reproduces Dijkstra's behaviour exactly.
    pub heuristic: Heuristic,
}

impl RouteRequest {
    /// Convenience constructor for a Dijkstra query.
    pub fn dijkstra(start: NodeId, goal: NodeId) -> Self {
        Self {
            start,
            goal,
            algorithm: RouteAlgorithm::Dijkstra,
            heuristic: Heuristic::Zero,
        }
    }

    /// Convenience constructor for a zero-heuristic A* query.
    pub fn a_star(start: NodeId, goal: NodeId) -> Self {
        Self {
            start,
            goal,
            algorithm: RouteAlgorithm::AStar,
            heuristic: Heuristic::Zero,
        }
    }

    /// Replace the heuristic used by A*.
    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }
}

/// Planned route returned by the engine.
///
/// An unreachable goal is not an error: `nodes` collapses to `[start]` and
/// `cost` is infinite, mirroring [`crate::path::Route`].
#[derive(Debug, Clone, Serialize)]
pub struct RoutePlan {
    pub algorithm: RouteAlgorithm,
    pub start: NodeId,
    pub goal: NodeId,
    pub nodes: Vec<NodeId>,
    pub cost: f64,
}

impl RoutePlan {
    /// Number of edges traversed.
    pub fn hop_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    pub fn is_unreachable(&self) -> bool {
        self.cost.is_infinite()
    }
}

/// Compute a route using the requested algorithm.
pub fn plan_route(network: &Network, request: &RouteRequest) -> RoutePlan {
    tracing::debug!(
        start = request.start,
        goal = request.goal,
        algorithm = %request.algorithm,
        "planning route"
    );

    let planner = select_planner(request.algorithm);
    let route = planner.find_route(
        network,
        request.start,
        request.goal,
        &SearchFilter::default(),
        &request.heuristic,
    );

    RoutePlan {
        algorithm: request.algorithm,
        start: request.start,
        goal: request.goal,
        nodes: route.nodes,
        cost: route.cost,
    }
}
