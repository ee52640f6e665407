//! Greedy multi-stop tour sequencing.
//!
//! Nearest-neighbour heuristic: the first stop is fixed as the starting
//! point, and the route repeatedly extends to the cheapest not-yet-visited
//! stop by A* travel time. O(k²) pathfinding calls for k stops, no
//! optimality guarantee, no backtracking.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::network::{Network, NodeId};
use crate::path::{a_star, Heuristic, SearchFilter};

/// Visiting order over the requested stops with the accumulated travel time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TourPlan {
    pub order: Vec<NodeId>,
    pub total_cost: f64,
}

/// Sequence `stops` greedily by nearest-neighbour travel time.
///
/// An empty stop list is rejected as invalid before any work is done. A
/// single stop is returned unchanged at zero cost. Ties between equally
/// cheap candidates break towards the lowest node id so the result is
/// reproducible; a stop that cannot be reached still gets visited, at
/// infinite cost, which makes the total infinite.
pub fn plan_tour(network: &Network, stops: &[NodeId]) -> Result<TourPlan> {
    if stops.is_empty() {
        return Err(Error::EmptyTour);
    }
    if stops.len() < 2 {
        return Ok(TourPlan {
            order: stops.to_vec(),
            total_cost: 0.0,
        });
    }

    tracing::debug!(stops = stops.len(), "planning greedy tour");

    let filter = SearchFilter::default();
    let mut remaining: Vec<NodeId> = stops[1..].to_vec();
    let mut current = stops[0];
    let mut order = vec![current];
    let mut total_cost = 0.0;

    while !remaining.is_empty() {
        let mut best: Option<(usize, NodeId, f64)> = None;
        for (index, &stop) in remaining.iter().enumerate() {
            let leg = a_star(network, current, stop, &filter, &Heuristic::Zero);
            let better = match best {
                None => true,
                Some((_, best_stop, best_cost)) => {
                    leg.cost < best_cost || (leg.cost == best_cost && stop < best_stop)
                }
            };
            if better {
                best = Some((index, stop, leg.cost));
            }
        }

        let Some((index, stop, cost)) = best else {
            break;
        };
        remaining.remove(index);
        order.push(stop);
        total_cost += cost;
        current = stop;
    }

    Ok(TourPlan { order, total_cost })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{city, triangle};
    use crate::routing::{plan_route, RouteRequest};

    #[test]
    fn empty_stop_list_is_invalid() {
        let network = triangle();
        assert!(matches!(plan_tour(&network, &[]), Err(Error::EmptyTour)));
    }

    #[test]
    fn single_stop_passes_through_unchanged() {
        let network = triangle();
        let plan = plan_tour(&network, &[2]).expect("valid request");
        assert_eq!(plan.order, vec![2]);
        assert_eq!(plan.total_cost, 0.0);
    }

    #[test]
    fn greedy_tour_visits_nearest_stop_first() {
        // From 0 the nearest of {2, 1} is 1 (cost 5), then 2 (cost 3).
        let network = triangle();
        let plan = plan_tour(&network, &[0, 2, 1]).expect("valid request");
        assert_eq!(plan.order, vec![0, 1, 2]);
        assert_eq!(plan.total_cost, 8.0);
    }

    #[test]
    fn tour_cost_equals_sum_of_pairwise_legs() {
        let network = city();
        let plan = plan_tour(&network, &[0, 5, 3, 7]).expect("valid request");

        let mut expected = 0.0;
        for pair in plan.order.windows(2) {
            expected += plan_route(&network, &RouteRequest::a_star(pair[0], pair[1])).cost;
        }
        assert_eq!(plan.total_cost, expected);
        assert_eq!(plan.order.len(), 4);
        assert_eq!(plan.order[0], 0);
    }

    #[test]
    fn equal_cost_candidates_break_towards_lowest_id() {
        // 0 is equidistant from 1 and 2.
        let mut network = Network::new();
        for id in 0..3 {
            network.add_node(id, 0.31 + 0.01 * f64::from(id), 32.55);
        }
        network.add_edge(0, 1, 4.0);
        network.add_edge(0, 2, 4.0);
        network.add_edge(1, 2, 4.0);

        let plan = plan_tour(&network, &[0, 2, 1]).expect("valid request");
        assert_eq!(plan.order, vec![0, 1, 2]);
    }

    #[test]
    fn unreachable_stop_makes_the_total_infinite() {
        let network = triangle();
        let plan = plan_tour(&network, &[0, 3]).expect("valid request");
        assert_eq!(plan.order, vec![0, 3]);
        assert!(plan.total_cost.is_infinite());
    }
}
