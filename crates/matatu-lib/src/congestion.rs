//! Alternative routes around a congested edge.
//!
//! Given an edge reported as saturated and a count of vehicles to redirect,
//! the advisor masks that edge in both directions and searches for distinct
//! detours between its endpoints, annotating each with an estimated
//! throughput capacity. Alternatives are found by iterative edge removal:
//! after each shortest path, its bottleneck edge is masked too and the search
//! repeats, which yields progressively more expensive but edge-disjoint-ish
//! detours without a full k-shortest-paths machinery.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::network::{Network, NodeId};
use crate::path::{dijkstra, Route, SearchFilter};

/// Default number of alternatives to look for.
pub const DEFAULT_MAX_ALTERNATIVES: usize = 3;

/// Default throughput of a single detour route, in vehicles per hour.
const DEFAULT_ROUTE_CAPACITY: f64 = 600.0;

/// A congestion reroute query.
#[derive(Debug, Clone, Copy)]
pub struct RerouteRequest {
    /// Endpoints of the saturated edge.
    pub edge: (NodeId, NodeId),
    /// Number of vehicles that need to leave the edge.
    pub vehicles: u32,
}

/// A detour path annotated with an estimated throughput capacity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlternativeRoute {
    pub route: Route,
    /// Estimated vehicles per hour this detour can absorb.
    pub capacity: f64,
}

/// How detour capacity is estimated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CapacityModel {
    /// Every detour absorbs a fixed number of vehicles per hour.
    Fixed { per_route: f64 },
    /// The redirected vehicles are split evenly across the detours found.
    Shared,
}

impl Default for CapacityModel {
    fn default() -> Self {
        CapacityModel::Fixed {
            per_route: DEFAULT_ROUTE_CAPACITY,
        }
    }
}

impl CapacityModel {
    fn capacity_for(&self, vehicles: u32, alternatives: usize) -> f64 {
        match self {
            CapacityModel::Fixed { per_route } => *per_route,
            CapacityModel::Shared => f64::from(vehicles) / alternatives.max(1) as f64,
        }
    }
}

/// Computes detours around saturated edges of a [`Network`].
#[derive(Debug, Clone)]
pub struct CongestionAdvisor<'a> {
    network: &'a Network,
    capacity: CapacityModel,
    max_alternatives: usize,
}

impl<'a> CongestionAdvisor<'a> {
    pub fn new(network: &'a Network) -> Self {
        Self {
            network,
            capacity: CapacityModel::default(),
            max_alternatives: DEFAULT_MAX_ALTERNATIVES,
        }
    }

    pub fn with_capacity_model(mut self, capacity: CapacityModel) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_max_alternatives(mut self, max_alternatives: usize) -> Self {
        self.max_alternatives = max_alternatives.max(1);
        self
    }

    /// Rank detours around the saturated edge by increasing travel time.
    ///
    /// Masking the edge can disconnect its endpoints; that is a valid outcome
    /// and produces an empty list, not an error. Errors are reserved for
    /// malformed requests (zero vehicles, degenerate edge).
    pub fn alternatives(&self, request: &RerouteRequest) -> Result<Vec<AlternativeRoute>> {
        if request.vehicles == 0 {
            return Err(Error::InvalidReroute {
                reason: "vehicle count must be positive",
            });
        }
        let (from, to) = request.edge;
        if from == to {
            return Err(Error::InvalidReroute {
                reason: "edge endpoints must differ",
            });
        }

        let mut filter = SearchFilter::default();
        filter.mask_edge(from, to);
        tracing::debug!(from, to, vehicles = request.vehicles, "rerouting around edge");

        let mut found: Vec<Route> = Vec::new();
        while found.len() < self.max_alternatives {
            let route = dijkstra(self.network, from, to, &filter);
            if route.is_unreachable() {
                break;
            }
            if found.iter().any(|known| known.nodes == route.nodes) {
                break;
            }

            match bottleneck_edge(self.network, &route) {
                Some((a, b)) => filter.mask_edge(a, b),
                None => {
                    found.push(route);
                    break;
                }
            }
            found.push(route);
        }

        found.sort_by(|a, b| a.cost.total_cmp(&b.cost));
        tracing::debug!(
            alternatives = found.len(),
            masked_edges = filter.masked_count(),
            "reroute search finished"
        );

        let count = found.len();
        Ok(found
            .into_iter()
            .map(|route| AlternativeRoute {
                capacity: self.capacity.capacity_for(request.vehicles, count),
                route,
            })
            .collect())
    }
}

/// Highest-travel-time edge along `route`, as an endpoint pair.
fn bottleneck_edge(network: &Network, route: &Route) -> Option<(NodeId, NodeId)> {
    let mut worst: Option<((NodeId, NodeId), f64)> = None;
    for pair in route.nodes.windows(2) {
        let travel_time = network.edge_travel_time(pair[0], pair[1])?;
        let heavier = match worst {
            None => true,
            Some((_, worst_time)) => travel_time > worst_time,
        };
        if heavier {
            worst = Some(((pair[0], pair[1]), travel_time));
        }
    }
    worst.map(|(edge, _)| edge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{detour_junction, triangle};

    #[test]
    fn alternatives_avoid_the_masked_edge_and_sort_by_cost() {
        let network = detour_junction();
        let advisor = CongestionAdvisor::new(&network);
        let alternatives = advisor
            .alternatives(&RerouteRequest {
                edge: (0, 1),
                vehicles: 100,
            })
            .expect("valid request");

        assert_eq!(alternatives.len(), 2);
        assert_eq!(alternatives[0].route.nodes, vec![0, 2, 1]);
        assert_eq!(alternatives[0].route.cost, 5.0);
        assert_eq!(alternatives[1].route.nodes, vec![0, 3, 1]);
        assert_eq!(alternatives[1].route.cost, 8.0);
        assert!(alternatives[0].route.cost <= alternatives[1].route.cost);
    }

    #[test]
    fn masking_a_bridge_yields_no_alternatives() {
        // In the triangle fixture 0 and 1 are only connected directly.
        let network = triangle();
        let advisor = CongestionAdvisor::new(&network);
        let alternatives = advisor
            .alternatives(&RerouteRequest {
                edge: (0, 1),
                vehicles: 50,
            })
            .expect("valid request");
        assert!(alternatives.is_empty());
    }

    #[test]
    fn zero_vehicles_is_rejected() {
        let network = triangle();
        let advisor = CongestionAdvisor::new(&network);
        let result = advisor.alternatives(&RerouteRequest {
            edge: (0, 1),
            vehicles: 0,
        });
        assert!(matches!(result, Err(Error::InvalidReroute { .. })));
    }

    #[test]
    fn degenerate_edge_is_rejected() {
        let network = triangle();
        let advisor = CongestionAdvisor::new(&network);
        let result = advisor.alternatives(&RerouteRequest {
            edge: (1, 1),
            vehicles: 10,
        });
        assert!(matches!(result, Err(Error::InvalidReroute { .. })));
    }

    #[test]
    fn shared_capacity_splits_vehicles_across_detours() {
        let network = detour_junction();
        let advisor = CongestionAdvisor::new(&network).with_capacity_model(CapacityModel::Shared);
        let alternatives = advisor
            .alternatives(&RerouteRequest {
                edge: (0, 1),
                vehicles: 90,
            })
            .expect("valid request");

        assert_eq!(alternatives.len(), 2);
        for alternative in &alternatives {
            assert_eq!(alternative.capacity, 45.0);
        }
    }

    #[test]
    fn fixed_capacity_uses_the_configured_rate() {
        let network = detour_junction();
        let advisor = CongestionAdvisor::new(&network)
            .with_capacity_model(CapacityModel::Fixed { per_route: 250.0 });
        let alternatives = advisor
            .alternatives(&RerouteRequest {
                edge: (0, 1),
                vehicles: 10,
            })
            .expect("valid request");
        assert!(alternatives.iter().all(|a| a.capacity == 250.0));
    }

    #[test]
    fn max_alternatives_caps_the_result() {
        let network = detour_junction();
        let advisor = CongestionAdvisor::new(&network).with_max_alternatives(1);
        let alternatives = advisor
            .alternatives(&RerouteRequest {
                edge: (0, 1),
                vehicles: 10,
            })
            .expect("valid request");
        assert_eq!(alternatives.len(), 1);
        assert_eq!(alternatives[0].route.nodes, vec![0, 2, 1]);
    }
}
