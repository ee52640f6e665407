//! In-memory transport network model.
//!
//! A [`Network`] is a weighted undirected graph over integer node
//! identifiers. It is built once by the caller (typically from a dataset file,
//! see [`crate::dataset`]) and treated as read-only afterwards; every query
//! component borrows it immutably, which makes unsynchronised concurrent
//! reads safe without locking.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::spatial::{GridBounds, SpatialGrid};

/// Identifier of a node in the transport network.
///
/// Ids are assigned by the dataset, dense from zero.
pub type NodeId = u32;

/// Mean Earth radius used by the haversine formula.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Geographic position of a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

impl Position {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to another position in kilometres (haversine).
    pub fn distance_km(&self, other: &Position) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = (other.lat - self.lat).to_radians();
        let dlon = (other.lon - self.lon).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }
}

/// Outgoing half of an undirected connection between two nodes.
///
/// Travel time is the edge weight; the unit is whatever the dataset uses
/// (minutes for the bundled city datasets) and only has to be consistent
/// across the network.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub target: NodeId,
    pub travel_time: f64,
}

/// Weighted undirected transport network with node positions.
///
/// Insertion is permissive by design: [`Network::add_edge`] implicitly
/// creates endpoints it has never seen, and [`Network::neighbours`] answers
/// unknown ids with an empty slice instead of an error. Strict validation
/// belongs to the dataset boundary, not the hot query path.
#[derive(Debug, Clone)]
pub struct Network {
    adjacency: HashMap<NodeId, Vec<Edge>>,
    positions: HashMap<NodeId, Position>,
    grid: SpatialGrid,
}

impl Network {
    /// Create an empty network using the default grid bounds.
    pub fn new() -> Self {
        Self::with_bounds(GridBounds::default())
    }

    /// Create an empty network whose spatial grid covers `bounds`.
    pub fn with_bounds(bounds: GridBounds) -> Self {
        Self {
            adjacency: HashMap::new(),
            positions: HashMap::new(),
            grid: SpatialGrid::new(bounds),
        }
    }

    /// Register a node with its position.
    ///
    /// Re-inserting an existing id overwrites its position and resets its
    /// adjacency to empty, so callers must add all nodes before edges. The
    /// node is indexed spatially only when its position falls inside the
    /// configured grid bounds.
    pub fn add_node(&mut self, id: NodeId, lat: f64, lon: f64) {
        let position = Position::new(lat, lon);
        self.adjacency.insert(id, Vec::new());
        self.positions.insert(id, position);
        self.grid.insert(id, position);
    }

    /// Insert an undirected edge between `a` and `b`.
    ///
    /// Unknown endpoints are created implicitly with empty adjacency and no
    /// position. The edge is stored symmetrically at equal weight.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, travel_time: f64) {
        self.adjacency.entry(a).or_default().push(Edge {
            target: b,
            travel_time,
        });
        self.adjacency.entry(b).or_default().push(Edge {
            target: a,
            travel_time,
        });
    }

    /// Neighbours of `id`, or an empty slice when the node is unknown.
    pub fn neighbours(&self, id: NodeId) -> &[Edge] {
        self.adjacency.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Position of `id`, if it was registered through [`Network::add_node`].
    pub fn position(&self, id: NodeId) -> Option<Position> {
        self.positions.get(&id).copied()
    }

    /// Whether `id` is present in the network.
    pub fn contains(&self, id: NodeId) -> bool {
        self.adjacency.contains_key(&id)
    }

    /// Number of nodes in the network.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Lowest travel time of a direct edge between `a` and `b`, if any.
    pub fn edge_travel_time(&self, a: NodeId, b: NodeId) -> Option<f64> {
        self.neighbours(a)
            .iter()
            .filter(|edge| edge.target == b)
            .map(|edge| edge.travel_time)
            .min_by(|x, y| x.total_cmp(y))
    }

    /// Snap a position to the closest network node.
    ///
    /// Uses the spatial grid for nodes inside the configured bounds and falls
    /// back to an exhaustive scan otherwise. Returns `None` on an empty
    /// network.
    pub fn nearest_node(&self, position: Position) -> Option<NodeId> {
        self.grid.nearest(position, &self.positions)
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}
