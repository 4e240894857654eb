//! Executor module for the exchange stage.
//!
//! This module provides the repartition primitive: selection vectors,
//! partition filter sets, and the [`Repartitioner`] that applies them to a
//! [`Block`](crate::storage::Block).

mod partition;
mod repartition;
pub mod vectorized;

use serde::{Deserialize, Serialize};

pub use partition::PartitionFilterSet;
pub use repartition::{repartition, RepartitionStats, Repartitioner};

/// Default minimum row count before the parallel path is used.
pub const DEFAULT_MIN_PARALLEL_ROWS: usize = 4096;

/// Configuration for the repartitioner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepartitionConfig {
    /// Filter (partition, column) cells on the rayon thread pool.
    pub parallel: bool,
    /// Blocks with fewer rows are always repartitioned sequentially.
    pub min_parallel_rows: usize,
    /// Check that every row is selected exactly once before filtering.
    pub verify_coverage: bool,
}

impl Default for RepartitionConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            min_parallel_rows: DEFAULT_MIN_PARALLEL_ROWS,
            verify_coverage: false,
        }
    }
}

impl RepartitionConfig {
    /// Creates a new repartition configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the parallel path.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the minimum row count for the parallel path.
    #[must_use]
    pub fn with_min_parallel_rows(mut self, min_parallel_rows: usize) -> Self {
        self.min_parallel_rows = min_parallel_rows;
        self
    }

    /// Enables or disables coverage verification.
    #[must_use]
    pub fn with_verify_coverage(mut self, verify_coverage: bool) -> Self {
        self.verify_coverage = verify_coverage;
        self
    }
}
