//! Error types for blockshuffle operations.

use thiserror::Error;

/// Result type alias using [`ShuffleError`].
pub type Result<T> = std::result::Result<T, ShuffleError>;

/// Error types for block construction and repartitioning.
#[derive(Debug, Error)]
pub enum ShuffleError {
    // ==================== Contract Violations ====================
    /// A selection vector does not cover the block it is applied to.
    #[error("Filter length mismatch: expected {expected} rows, got {actual}")]
    FilterLengthMismatch { expected: usize, actual: usize },

    /// Block columns disagree with the schema they are bound to.
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Invalid schema definition (duplicate or empty column names).
    #[error("Schema error: {0}")]
    SchemaError(String),

    /// Columns of one block have different lengths.
    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Positional access past the last column.
    #[error("Column index {index} out of bounds for block with {columns} columns")]
    ColumnIndexOutOfBounds { index: usize, columns: usize },

    /// Type mismatch errors.
    #[error("Type error: expected {expected}, got {actual}")]
    TypeError { expected: String, actual: String },

    // ==================== Partitioning Errors ====================
    /// Malformed partition filter set (no partitions, bad assignment, ragged filters).
    #[error("Invalid partitioning: {0}")]
    InvalidPartitioning(String),

    /// A row is selected by zero or several partitions.
    #[error("Row {row} is selected by {selections} partitions, expected exactly 1")]
    PartitionCoverage { row: usize, selections: usize },

    // ==================== Resource Errors ====================
    /// Reserving memory for an output column failed.
    #[error("Allocation of {bytes} bytes failed")]
    AllocationFailed { bytes: usize },

    // ==================== Interop Errors ====================
    /// Arrow conversion error.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

impl ShuffleError {
    /// Builds a [`ShuffleError::AllocationFailed`] for a reservation of `count` elements of `T`.
    pub(crate) fn allocation<T>(count: usize) -> Self {
        ShuffleError::AllocationFailed {
            bytes: count.saturating_mul(std::mem::size_of::<T>()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_length_display() {
        let err = ShuffleError::FilterLengthMismatch {
            expected: 10,
            actual: 7,
        };
        assert!(err.to_string().contains("expected 10"));
        assert!(err.to_string().contains("got 7"));
    }

    #[test]
    fn test_allocation_bytes() {
        let err = ShuffleError::allocation::<u64>(4);
        assert!(matches!(err, ShuffleError::AllocationFailed { bytes: 32 }));
    }
}
