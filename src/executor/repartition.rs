//! Block repartitioning.
//!
//! Splits one source block into one output block per partition. Each output
//! is cloned empty from the source schema, then every column slot is
//! replaced by the source column filtered with that partition's selection
//! vector. The (partition, column) cells are independent: they read only the
//! shared source and each writes a freshly allocated column, so the parallel
//! path needs no locking.

use rayon::prelude::*;
use tracing::{debug, trace, warn};

use crate::error::{Result, ShuffleError};
use crate::executor::vectorized::Filter;
use crate::executor::{PartitionFilterSet, RepartitionConfig};
use crate::storage::{Block, Column};

/// Splits blocks according to a [`PartitionFilterSet`].
#[derive(Debug, Clone, Default)]
pub struct Repartitioner {
    config: RepartitionConfig,
}

impl Repartitioner {
    /// Creates a repartitioner with the given configuration.
    #[must_use]
    pub fn new(config: RepartitionConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &RepartitionConfig {
        &self.config
    }

    /// Splits `source` into `filters.num_partitions()` blocks.
    ///
    /// Output `p` holds the rows selected by filter `p`, in source order, with
    /// the source schema. Either every output is produced or an error is
    /// returned and nothing is.
    ///
    /// # Errors
    ///
    /// - [`ShuffleError::FilterLengthMismatch`] if the filters do not cover
    ///   exactly the source rows.
    /// - [`ShuffleError::PartitionCoverage`] if coverage verification is
    ///   enabled and some row is not selected exactly once.
    /// - [`ShuffleError::AllocationFailed`] if an output column cannot be
    ///   allocated.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the output row counts do not add up to the
    /// source row count, which means the filter set dropped or duplicated
    /// rows.
    pub fn repartition(&self, source: &Block, filters: &PartitionFilterSet) -> Result<Vec<Block>> {
        let rows = source.num_rows();
        if filters.num_rows() != rows {
            return Err(ShuffleError::FilterLengthMismatch {
                expected: rows,
                actual: filters.num_rows(),
            });
        }

        if self.config.verify_coverage {
            if let Err(e) = filters.verify_coverage() {
                warn!(error = %e, "partition filter set rejected");
                return Err(e);
            }
        }

        let parallel = self.use_parallel(source, filters);
        debug!(
            partitions = filters.num_partitions(),
            columns = source.num_columns(),
            rows,
            parallel,
            "repartitioning block"
        );

        let outputs = if parallel {
            filters
                .filters()
                .par_iter()
                .enumerate()
                .map(|(p, filter)| {
                    let columns = source
                        .columns()
                        .par_iter()
                        .map(|column| column.filter(filter))
                        .collect::<Result<Vec<_>>>()?;
                    assemble(source, p, columns)
                })
                .collect::<Result<Vec<_>>>()?
        } else {
            filters
                .iter()
                .enumerate()
                .map(|(p, filter)| {
                    let columns = filter_columns(source, filter)?;
                    assemble(source, p, columns)
                })
                .collect::<Result<Vec<_>>>()?
        };

        debug_assert_eq!(
            outputs.iter().map(Block::num_rows).sum::<usize>(),
            rows,
            "partition filters dropped or duplicated rows"
        );
        Ok(outputs)
    }

    fn use_parallel(&self, source: &Block, filters: &PartitionFilterSet) -> bool {
        self.config.parallel
            && source.num_rows() >= self.config.min_parallel_rows
            && filters.num_partitions() * source.num_columns() > 1
    }
}

/// Splits `source` with the default configuration.
///
/// # Errors
///
/// See [`Repartitioner::repartition`].
pub fn repartition(source: &Block, filters: &PartitionFilterSet) -> Result<Vec<Block>> {
    Repartitioner::default().repartition(source, filters)
}

fn filter_columns(source: &Block, filter: &Filter) -> Result<Vec<Column>> {
    source
        .columns()
        .iter()
        .map(|column| column.filter(filter))
        .collect()
}

/// Moves filtered columns into a block cloned empty from the source.
fn assemble(source: &Block, partition: usize, columns: Vec<Column>) -> Result<Block> {
    let mut output = source.clone_empty();
    if output.num_columns() != columns.len() {
        return Err(ShuffleError::SchemaMismatch(format!(
            "partition {partition} produced {} columns, schema has {}",
            columns.len(),
            output.num_columns()
        )));
    }
    for (position, column) in columns.into_iter().enumerate() {
        output.replace_column(position, column)?;
    }
    output.check_lengths()?;
    trace!(
        partition,
        rows = output.num_rows(),
        bytes = output.bytes(),
        "partition assembled"
    );
    Ok(output)
}

/// Row and byte totals of a set of partitioned blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepartitionStats {
    /// Rows in each output partition.
    pub rows_per_partition: Vec<usize>,
    /// Logical bytes in each output partition.
    pub bytes_per_partition: Vec<usize>,
}

impl RepartitionStats {
    /// Collects totals from repartition outputs.
    #[must_use]
    pub fn from_outputs(outputs: &[Block]) -> Self {
        Self {
            rows_per_partition: outputs.iter().map(Block::num_rows).collect(),
            bytes_per_partition: outputs.iter().map(Block::bytes).collect(),
        }
    }

    /// Sum of rows across partitions.
    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.rows_per_partition.iter().sum()
    }

    /// Sum of bytes across partitions.
    #[must_use]
    pub fn total_bytes(&self) -> usize {
        self.bytes_per_partition.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataType, Value};

    fn source_block() -> Block {
        Block::from_columns(vec![
            ("id", Column::from(vec![0u64, 1, 2, 3, 4, 5])),
            ("name", Column::from(vec!["a", "b", "c", "d", "e", "f"])),
            (
                "score",
                Column::from_values(
                    DataType::Float64,
                    true,
                    vec![
                        Value::Float64(0.0),
                        Value::Null,
                        Value::Float64(2.0),
                        Value::Float64(3.0),
                        Value::Null,
                        Value::Float64(5.0),
                    ],
                )
                .unwrap(),
            ),
        ])
        .unwrap()
    }

    fn sequential() -> Repartitioner {
        Repartitioner::new(RepartitionConfig::new().with_parallel(false))
    }

    fn parallel() -> Repartitioner {
        Repartitioner::new(
            RepartitionConfig::new()
                .with_parallel(true)
                .with_min_parallel_rows(0),
        )
    }

    #[test]
    fn test_repartition_splits_rows() {
        let source = source_block();
        let filters = PartitionFilterSet::from_assignments(&[1, 0, 1, 2, 0, 1], 3).unwrap();
        let outputs = sequential().repartition(&source, &filters).unwrap();

        assert_eq!(outputs.len(), 3);
        assert_eq!(outputs[0].column(0), Some(&Column::from(vec![1u64, 4])));
        assert_eq!(outputs[1].column(0), Some(&Column::from(vec![0u64, 2, 5])));
        assert_eq!(outputs[2].column(1), Some(&Column::from(vec!["d"])));
        assert_eq!(outputs[0].column(2).unwrap().get(0), Some(Value::Null));
        assert_eq!(
            outputs[1].column(2).unwrap().get(2),
            Some(Value::Float64(5.0))
        );
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let source = source_block();
        let filters = PartitionFilterSet::uniform_random(source.num_rows(), 4, 7).unwrap();
        let seq = sequential().repartition(&source, &filters).unwrap();
        let par = parallel().repartition(&source, &filters).unwrap();
        assert_eq!(seq, par);
    }

    #[test]
    fn test_outputs_share_source_schema() {
        let source = source_block();
        let filters = PartitionFilterSet::uniform_random(source.num_rows(), 3, 1).unwrap();
        for output in parallel().repartition(&source, &filters).unwrap() {
            assert!(std::sync::Arc::ptr_eq(output.schema(), source.schema()));
        }
    }

    #[test]
    fn test_filter_length_mismatch_fails_fast() {
        let source = source_block();
        let filters = PartitionFilterSet::uniform_random(5, 2, 0).unwrap();
        assert!(matches!(
            repartition(&source, &filters),
            Err(ShuffleError::FilterLengthMismatch {
                expected: 6,
                actual: 5
            })
        ));
    }

    #[test]
    fn test_verify_coverage_rejects_overlap() {
        let source = source_block();
        let filters =
            PartitionFilterSet::new(vec![Filter::all(6), Filter::from_bools(&[true; 6])]).unwrap();
        let repartitioner = Repartitioner::new(RepartitionConfig::new().with_verify_coverage(true));
        assert!(matches!(
            repartitioner.repartition(&source, &filters),
            Err(ShuffleError::PartitionCoverage { row: 0, .. })
        ));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "dropped or duplicated")]
    fn test_debug_check_catches_dropped_rows() {
        let source = source_block();
        let filters = PartitionFilterSet::new(vec![Filter::new(6), Filter::new(6)]).unwrap();
        let _ = sequential().repartition(&source, &filters);
    }

    #[test]
    fn test_single_partition_copies_block() {
        let source = source_block();
        let filters = PartitionFilterSet::from_assignments(&[0; 6], 1).unwrap();
        let outputs = repartition(&source, &filters).unwrap();
        assert_eq!(outputs, vec![source]);
    }

    #[test]
    fn test_empty_source() {
        let source = source_block().clone_empty();
        let filters = PartitionFilterSet::from_assignments(&[], 4).unwrap();
        let outputs = parallel().repartition(&source, &filters).unwrap();
        assert_eq!(outputs.len(), 4);
        assert!(outputs.iter().all(|b| b.num_rows() == 0 && b.num_columns() == 3));
    }

    #[test]
    fn test_stats() {
        let source = source_block();
        let filters = PartitionFilterSet::from_assignments(&[0, 0, 1, 1, 1, 1], 2).unwrap();
        let outputs = repartition(&source, &filters).unwrap();
        let stats = RepartitionStats::from_outputs(&outputs);
        assert_eq!(stats.rows_per_partition, vec![2, 4]);
        assert_eq!(stats.total_rows(), 6);
        assert_eq!(stats.total_bytes(), source.bytes());
    }
}
