//! Route planning strategies.
//!
//! Each algorithm is encapsulated in its own planner struct behind the
//! [`RoutePlanner`] trait, so [`super::plan_route`] stays free of per-call
//! algorithm branching.

use crate::network::{Network, NodeId};
use crate::path::{a_star, dijkstra, Heuristic, Route, SearchFilter};

use super::RouteAlgorithm;

/// Trait for route planning strategies.
pub trait RoutePlanner: Send + Sync {
    /// The algorithm identifier for this planner.
    fn algorithm(&self) -> RouteAlgorithm;

    /// Execute the search, honouring the edge mask.
    ///
    /// Total by construction: an unreachable goal yields the degenerate
    /// [`Route`] rather than an error.
    fn find_route(
        &self,
        network: &Network,
        start: NodeId,
        goal: NodeId,
        filter: &SearchFilter,
        heuristic: &Heuristic,
    ) -> Route;
}

/// Dijkstra planner. Ignores the heuristic.
#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraPlanner;

impl RoutePlanner for DijkstraPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::Dijkstra
    }

    fn find_route(
        &self,
        network: &Network,
        start: NodeId,
        goal: NodeId,
        filter: &SearchFilter,
        _heuristic: &Heuristic,
    ) -> Route {
        dijkstra(network, start, goal, filter)
    }
}

/// A* planner guided by the request's heuristic.
#[derive(Debug, Clone, Copy, Default)]
pub struct AStarPlanner;

impl RoutePlanner for AStarPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::AStar
    }

    fn find_route(
        &self,
        network: &Network,
        start: NodeId,
        goal: NodeId,
        filter: &SearchFilter,
        heuristic: &Heuristic,
    ) -> Route {
        a_star(network, start, goal, filter, heuristic)
    }
}

/// Select the planner for a given algorithm.
pub fn select_planner(algorithm: RouteAlgorithm) -> Box<dyn RoutePlanner> {
    match algorithm {
        RouteAlgorithm::Dijkstra => Box::new(DijkstraPlanner),
        RouteAlgorithm::AStar => Box::new(AStarPlanner),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planners_report_their_algorithm() {
        assert_eq!(DijkstraPlanner.algorithm(), RouteAlgorithm::Dijkstra);
        assert_eq!(AStarPlanner.algorithm(), RouteAlgorithm::AStar);
    }

    #[test]
    fn select_planner_chooses_matching_strategy() {
        for algorithm in [RouteAlgorithm::Dijkstra, RouteAlgorithm::AStar] {
            assert_eq!(select_planner(algorithm).algorithm(), algorithm);
        }
    }
}
