//! blockshuffle - columnar block repartitioning
//!
//! Splits one in-memory [`Block`] of equal-length typed columns into one
//! output block per partition, as done by the exchange stage of a parallel
//! query engine. A [`PartitionFilterSet`] supplies one selection vector per
//! partition; every column is filtered independently with each vector.
//!
//! ```
//! use blockshuffle::{repartition, Block, Column, PartitionFilterSet};
//!
//! let block = Block::from_columns(vec![
//!     ("id", Column::from(vec![10u64, 11, 12, 13])),
//!     ("name", Column::from(vec!["a", "b", "c", "d"])),
//! ])?;
//! let filters = PartitionFilterSet::from_assignments(&[1, 0, 1, 1], 2)?;
//!
//! let outputs = repartition(&block, &filters)?;
//! assert_eq!(outputs[0].num_rows(), 1);
//! assert_eq!(outputs[1].column(0), Some(&Column::from(vec![10u64, 12, 13])));
//! # Ok::<(), blockshuffle::ShuffleError>(())
//! ```

pub mod catalog;
pub mod error;
pub mod executor;
pub mod storage;
pub mod types;

pub use catalog::{Field, Schema, SchemaRef};
pub use error::{Result, ShuffleError};
pub use executor::vectorized::Filter;
pub use executor::{
    repartition, PartitionFilterSet, RepartitionConfig, RepartitionStats, Repartitioner,
};
pub use storage::{Block, Column, NullableColumn, StringColumn};
pub use types::{DataType, Value};
