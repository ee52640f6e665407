use thiserror::Error;

use crate::network::NodeId;

/// Convenient result alias for the matatu library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Unreachable routes are deliberately not represented here: pathfinding
/// reports them through the degenerate [`crate::path::Route`] value so the
/// hot path stays free of control flow by error.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a multi-stop request contains no stops.
    #[error("multi-stop request contained no stops")]
    EmptyTour,

    /// Raised when a batch request contains no path queries.
    #[error("batch request contained no path queries")]
    EmptyBatch,

    /// Raised when a congestion reroute request is malformed.
    #[error("invalid reroute request: {reason}")]
    InvalidReroute { reason: &'static str },

    /// Raised by the dataset boundary for non-positive or non-finite weights.
    #[error("edge {from} -> {to} has invalid travel time {travel_time}")]
    InvalidEdgeWeight {
        from: NodeId,
        to: NodeId,
        travel_time: f64,
    },

    /// Raised by the dataset boundary when an edge references an undeclared node.
    #[error("unknown node id: {id}")]
    UnknownNode { id: NodeId },

    /// Wrapper for worker pool construction failures.
    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for dataset JSON parsing errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
