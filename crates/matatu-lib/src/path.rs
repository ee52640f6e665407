//! Shortest-path searches over a [`Network`].
//!
//! Both searches are stateless over the borrowed network: every call
//! allocates its own distance and predecessor maps plus a lazy-deletion
//! binary heap, so concurrent invocations share no mutable state.
//!
//! Unreachable and unknown endpoints are not errors. They degenerate to a
//! single-node route with infinite cost (see [`Route::unreachable`]), which
//! keeps the hot path free of control flow by error; callers check
//! [`Route::is_unreachable`] instead.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use serde::Serialize;

use crate::network::{Network, NodeId};

/// Ordered sequence of node ids with its total travel time.
///
/// The first node is the query's start and the last its goal whenever the
/// goal is reachable; otherwise the route is `[start]` with infinite cost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub nodes: Vec<NodeId>,
    pub cost: f64,
}

impl Route {
    /// Degenerate result for a goal that cannot be reached from `start`.
    pub fn unreachable(start: NodeId) -> Self {
        Self {
            nodes: vec![start],
            cost: f64::INFINITY,
        }
    }

    pub fn is_unreachable(&self) -> bool {
        self.cost.is_infinite()
    }

    /// Number of edges traversed.
    pub fn hop_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

/// Undirected edge identity, normalised so `(a, b)` and `(b, a)` collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct EdgeKey(NodeId, NodeId);

impl EdgeKey {
    fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }
}

/// Edge mask consulted during relaxation.
///
/// An empty filter admits every edge. The congestion advisor masks the
/// saturated edge (and, iteratively, bottleneck edges of already-found
/// alternatives) to steer searches around it; masking applies to both
/// directions of an undirected edge.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    masked: HashSet<EdgeKey>,
}

impl SearchFilter {
    /// Exclude the undirected edge between `a` and `b` from consideration.
    pub fn mask_edge(&mut self, a: NodeId, b: NodeId) {
        self.masked.insert(EdgeKey::new(a, b));
    }

    /// Whether traversal from `from` to `to` is admitted.
    pub fn allows(&self, from: NodeId, to: NodeId) -> bool {
        !self.masked.contains(&EdgeKey::new(from, to))
    }

    pub fn masked_count(&self) -> usize {
        self.masked.len()
    }
}

/// Admissible estimate of remaining travel time used by [`a_star`].
///
/// [`Heuristic::Zero`] never overestimates and makes A* behave exactly like
/// Dijkstra; it is the default. [`Heuristic::TravelTime`] lower-bounds the
/// remaining cost by the straight-line distance at an assumed maximum speed,
/// which keeps it admissible as long as no vehicle beats that speed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Heuristic {
    #[default]
    Zero,
    /// Haversine distance divided by `max_speed_kmh`, in minutes.
    TravelTime { max_speed_kmh: f64 },
}

impl Heuristic {
    /// Estimated remaining travel time from `from` to `goal`.
    ///
    /// Falls back to zero when either node has no position, which is always
    /// admissible.
    pub fn estimate(&self, network: &Network, from: NodeId, goal: NodeId) -> f64 {
        match self {
            Heuristic::Zero => 0.0,
            Heuristic::TravelTime { max_speed_kmh } => {
                if *max_speed_kmh <= 0.0 {
                    return 0.0;
                }
                match (network.position(from), network.position(goal)) {
                    (Some(a), Some(b)) => a.distance_km(&b) / max_speed_kmh * 60.0,
                    _ => 0.0,
                }
            }
        }
    }
}

/// Dijkstra's algorithm between `start` and `goal`.
///
/// Classic priority-queue relaxation with lazy deletion: popped entries whose
/// recorded cost exceeds the current best for that node are skipped. The
/// search stops as soon as `goal` is popped, which is valid because edge
/// weights are non-negative.
pub fn dijkstra(network: &Network, start: NodeId, goal: NodeId, filter: &SearchFilter) -> Route {
    let mut distances: HashMap<NodeId, f64> = HashMap::new();
    let mut parents: HashMap<NodeId, NodeId> = HashMap::new();
    let mut queue = BinaryHeap::new();

    distances.insert(start, 0.0);
    queue.push(QueueEntry::new(start, 0.0));

    while let Some(entry) = queue.pop() {
        let cost = entry.cost.0;
        if cost > *distances.get(&entry.node).unwrap_or(&f64::INFINITY) {
            continue; // stale entry superseded by a cheaper relaxation
        }
        if entry.node == goal {
            return Route {
                nodes: reconstruct(&parents, start, goal),
                cost,
            };
        }

        for edge in network.neighbours(entry.node) {
            if !filter.allows(entry.node, edge.target) {
                continue;
            }
            let next_cost = cost + edge.travel_time;
            if next_cost < *distances.get(&edge.target).unwrap_or(&f64::INFINITY) {
                distances.insert(edge.target, next_cost);
                parents.insert(edge.target, entry.node);
                queue.push(QueueEntry::new(edge.target, next_cost));
            }
        }
    }

    Route::unreachable(start)
}

/// A* search between `start` and `goal`.
///
/// Identical relaxation structure to [`dijkstra`], but the queue orders
/// entries by `f = g + h` where `h` is the supplied [`Heuristic`]. With
/// [`Heuristic::Zero`] the result is mathematically equivalent to Dijkstra.
pub fn a_star(
    network: &Network,
    start: NodeId,
    goal: NodeId,
    filter: &SearchFilter,
    heuristic: &Heuristic,
) -> Route {
    let mut g_score: HashMap<NodeId, f64> = HashMap::new();
    let mut parents: HashMap<NodeId, NodeId> = HashMap::new();
    let mut queue = BinaryHeap::new();

    g_score.insert(start, 0.0);
    queue.push(AStarEntry::new(
        start,
        0.0,
        heuristic.estimate(network, start, goal),
    ));

    while let Some(entry) = queue.pop() {
        let cost = entry.cost.0;
        if cost > *g_score.get(&entry.node).unwrap_or(&f64::INFINITY) {
            continue;
        }
        if entry.node == goal {
            return Route {
                nodes: reconstruct(&parents, start, goal),
                cost,
            };
        }

        for edge in network.neighbours(entry.node) {
            if !filter.allows(entry.node, edge.target) {
                continue;
            }
            let tentative = cost + edge.travel_time;
            if tentative < *g_score.get(&edge.target).unwrap_or(&f64::INFINITY) {
                g_score.insert(edge.target, tentative);
                parents.insert(edge.target, entry.node);
                let estimate = heuristic.estimate(network, edge.target, goal);
                queue.push(AStarEntry::new(edge.target, tentative, estimate));
            }
        }
    }

    Route::unreachable(start)
}

fn reconstruct(parents: &HashMap<NodeId, NodeId>, start: NodeId, goal: NodeId) -> Vec<NodeId> {
    let mut nodes = vec![goal];
    let mut current = goal;
    while current != start {
        match parents.get(&current) {
            Some(&parent) => {
                nodes.push(parent);
                current = parent;
            }
            None => break,
        }
    }
    nodes.reverse();
    nodes
}

/// Total order over f64 costs so they can key a [`BinaryHeap`].
#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: NodeId,
    cost: FloatOrd,
}

impl QueueEntry {
    fn new(node: NodeId, cost: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct AStarEntry {
    node: NodeId,
    cost: FloatOrd,
    estimate: FloatOrd,
}

impl AStarEntry {
    fn new(node: NodeId, cost: f64, heuristic: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
            estimate: FloatOrd(cost + heuristic),
        }
    }
}

impl Ord for AStarEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for AStarEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
