//! Concurrent execution of independent path queries.
//!
//! The dispatcher owns one bounded rayon thread pool, created at startup and
//! reused across batches. Requests are embarrassingly parallel: each A* call
//! allocates its own working state and only reads the shared network, so no
//! coordination beyond the final join is needed. Results come back in input
//! order regardless of completion order.
//!
//! Failures are isolated per request by construction: the searches are total
//! functions that report unreachable goals as degenerate routes instead of
//! raising, so a batch never aborts halfway with partial results.

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::network::{Network, NodeId};
use crate::path::{a_star, Heuristic, Route, SearchFilter};

/// Default worker pool size.
pub const DEFAULT_WORKERS: usize = 4;

/// Bounded worker pool fanning independent path queries out concurrently.
#[derive(Debug)]
pub struct BatchDispatcher {
    pool: rayon::ThreadPool,
}

impl BatchDispatcher {
    /// Build a dispatcher with a pool of `workers` threads (at least one).
    pub fn new(workers: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .build()?;
        Ok(Self { pool })
    }

    /// Build a dispatcher with [`DEFAULT_WORKERS`] threads.
    pub fn with_default_workers() -> Result<Self> {
        Self::new(DEFAULT_WORKERS)
    }

    /// Execute one zero-heuristic A* query per `(start, goal)` pair.
    ///
    /// Returns one [`Route`] per request, in request order. An empty batch is
    /// rejected before any work is dispatched.
    pub fn run(&self, network: &Network, requests: &[(NodeId, NodeId)]) -> Result<Vec<Route>> {
        if requests.is_empty() {
            return Err(Error::EmptyBatch);
        }

        tracing::debug!(requests = requests.len(), "dispatching batch");

        let filter = SearchFilter::default();
        let routes = self.pool.install(|| {
            requests
                .par_iter()
                .map(|&(start, goal)| a_star(network, start, goal, &filter, &Heuristic::Zero))
                .collect()
        });

        Ok(routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{city, triangle};

    #[test]
    fn batch_results_come_back_in_request_order() {
        let network = triangle();
        let dispatcher = BatchDispatcher::new(2).expect("pool builds");
        let results = dispatcher
            .run(&network, &[(0, 2), (0, 3)])
            .expect("non-empty batch");

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].nodes, vec![0, 1, 2]);
        assert_eq!(results[0].cost, 8.0);
        assert!(results[1].is_unreachable());
        assert_eq!(results[1].nodes, vec![0]);
    }

    #[test]
    fn batch_matches_sequential_execution() {
        let network = city();
        let requests: Vec<(NodeId, NodeId)> = (0..8).map(|goal| (0, goal)).collect();

        let dispatcher = BatchDispatcher::with_default_workers().expect("pool builds");
        let parallel = dispatcher.run(&network, &requests).expect("non-empty batch");

        let filter = SearchFilter::default();
        for (result, &(start, goal)) in parallel.iter().zip(&requests) {
            let sequential = a_star(&network, start, goal, &filter, &Heuristic::Zero);
            assert_eq!(result, &sequential, "mismatch for {start} -> {goal}");
        }
    }

    #[test]
    fn empty_batch_is_rejected() {
        let network = triangle();
        let dispatcher = BatchDispatcher::new(1).expect("pool builds");
        assert!(matches!(
            dispatcher.run(&network, &[]),
            Err(Error::EmptyBatch)
        ));
    }

    #[test]
    fn zero_workers_clamps_to_one() {
        let network = triangle();
        let dispatcher = BatchDispatcher::new(0).expect("pool builds");
        let results = dispatcher.run(&network, &[(0, 1)]).expect("non-empty batch");
        assert_eq!(results[0].cost, 5.0);
    }
}
