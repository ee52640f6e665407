//! matatu routing engine.
//!
//! This crate answers routing queries over a weighted undirected transport
//! network: point-to-point shortest paths (Dijkstra and A*), alternative
//! routes around a congested edge, greedy multi-stop tours, and batches of
//! independent path queries executed on a bounded worker pool.
//!
//! The network is built once at startup (usually through [`load_network`])
//! and never mutated afterwards; every query component borrows it immutably,
//! so concurrent reads need no locking. Higher-level consumers (the CLI, any
//! request layer) should only depend on the types re-exported here.

#![deny(warnings)]

pub mod batch;
pub mod congestion;
pub mod dataset;
pub mod error;
pub mod network;
pub mod path;
pub mod routing;
pub mod spatial;
pub mod tour;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use batch::{BatchDispatcher, DEFAULT_WORKERS};
pub use congestion::{
    AlternativeRoute, CapacityModel, CongestionAdvisor, RerouteRequest, DEFAULT_MAX_ALTERNATIVES,
};
pub use dataset::{load_network, EdgeRecord, NetworkFile, NodeRecord};
pub use error::{Error, Result};
pub use network::{Edge, Network, NodeId, Position};
pub use path::{a_star, dijkstra, Heuristic, Route, SearchFilter};
pub use routing::{plan_route, RouteAlgorithm, RoutePlan, RouteRequest};
pub use spatial::{GridBounds, SpatialGrid, GRID_DIM};
pub use tour::{plan_tour, TourPlan};
