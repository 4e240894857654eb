//! Unit tests for blockshuffle.

use std::sync::Arc;

use blockshuffle::{
    Block, Column, DataType, Field, Filter, PartitionFilterSet, RepartitionConfig, Schema,
    ShuffleError, Value,
};

// =============================================================================
// Error Tests
// =============================================================================

mod error_tests {
    use super::*;

    #[test]
    fn test_schema_mismatch_display() {
        let err = ShuffleError::SchemaMismatch("column 'a' is declared INT64".into());
        assert!(err.to_string().contains("Schema mismatch"));
        assert!(err.to_string().contains("INT64"));
    }

    #[test]
    fn test_coverage_display() {
        let err = ShuffleError::PartitionCoverage {
            row: 12,
            selections: 0,
        };
        assert!(err.to_string().contains("Row 12"));
        assert!(err.to_string().contains("0 partitions"));
    }

    #[test]
    fn test_column_length_display() {
        let err = ShuffleError::ColumnLengthMismatch {
            column: "price".into(),
            expected: 4,
            actual: 3,
        };
        assert!(err.to_string().contains("'price'"));
        assert!(err.to_string().contains("expected 4"));
    }
}

// =============================================================================
// Column Tests
// =============================================================================

mod column_tests {
    use super::*;

    #[test]
    fn test_filter_can_be_reapplied() {
        let col = Column::from(vec![1u64, 2, 3, 4]);
        let evens = col
            .filter(&Filter::from_bools(&[false, true, false, true]))
            .unwrap();
        let odds = col
            .filter(&Filter::from_bools(&[true, false, true, false]))
            .unwrap();
        assert_eq!(evens, Column::from(vec![2u64, 4]));
        assert_eq!(odds, Column::from(vec![1u64, 3]));
        assert_eq!(col, Column::from(vec![1u64, 2, 3, 4]));
    }

    #[test]
    fn test_filter_every_type() {
        let filter = Filter::from_bools(&[true, false, true]);
        let columns = vec![
            Column::from(vec![1u8, 2, 3]),
            Column::from(vec![1u64, 2, 3]),
            Column::from(vec![1i32, 2, 3]),
            Column::from(vec![1i64, 2, 3]),
            Column::from(vec![1.0f32, 2.0, 3.0]),
            Column::from(vec![1.0f64, 2.0, 3.0]),
            Column::from(vec![true, false, true]),
            Column::from(vec!["x", "yy", "zzz"]),
            Column::with_len(DataType::Int64, true, 3).unwrap(),
        ];
        for col in columns {
            let out = col.filter(&filter).unwrap();
            assert_eq!(out.len(), 2);
            assert_eq!(out.data_type(), col.data_type());
            assert_eq!(out.is_nullable(), col.is_nullable());
            assert_eq!(out.get(1), col.get(2));
        }
    }

    #[test]
    fn test_bytes_per_type() {
        assert_eq!(Column::from(vec![1u8, 2]).bytes(), 2);
        assert_eq!(Column::from(vec![1i32, 2]).bytes(), 8);
        assert_eq!(Column::from(vec![1.0f64, 2.0]).bytes(), 16);
        assert_eq!(Column::from(vec![true]).bytes(), 1);
        assert_eq!(Column::from(vec!["abc"]).bytes(), 3 + 8);
    }

    #[test]
    fn test_from_values_rejects_null_in_non_nullable() {
        let err = Column::from_values(DataType::UInt64, false, vec![Value::UInt64(1), Value::Null])
            .unwrap_err();
        assert!(matches!(err, ShuffleError::TypeError { .. }));
    }
}

// =============================================================================
// Block Tests
// =============================================================================

mod block_tests {
    use super::*;

    fn schema() -> Arc<Schema> {
        Arc::new(
            Schema::new(vec![
                Field::new("id", DataType::UInt64, false).unwrap(),
                Field::new("comment", DataType::String, true).unwrap(),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn test_try_new_validates_column_count() {
        let err = Block::try_new(schema(), vec![Column::from(vec![1u64])]).unwrap_err();
        assert!(matches!(err, ShuffleError::SchemaMismatch(_)));
    }

    #[test]
    fn test_try_new_validates_nullability() {
        let err = Block::try_new(
            schema(),
            vec![Column::from(vec![1u64]), Column::from(vec!["not nullable"])],
        )
        .unwrap_err();
        assert!(err.to_string().contains("'comment'"));
    }

    #[test]
    fn test_clone_empty_from_explicit_schema() {
        let comment = Column::from_values(
            DataType::String,
            true,
            vec![Value::Null, Value::String("hi".into())],
        )
        .unwrap();
        let block = Block::try_new(schema(), vec![Column::from(vec![1u64, 2]), comment]).unwrap();
        let empty = block.clone_empty();
        assert_eq!(empty.schema().as_ref(), block.schema().as_ref());
        assert_eq!(empty.num_rows(), 0);
        assert!(empty.column(1).unwrap().is_nullable());
        assert_eq!(empty.bytes(), 0);
    }

    #[test]
    fn test_zero_column_block() {
        let block = Block::empty();
        assert_eq!(block.num_rows(), 0);
        assert_eq!(block.clone_empty(), block);
    }
}

// =============================================================================
// Partition Filter Set Tests
// =============================================================================

mod partition_tests {
    use super::*;

    #[test]
    fn test_filter_set_iteration_order() {
        let set = PartitionFilterSet::from_assignments(&[2, 1, 0], 3).unwrap();
        let firsts: Vec<usize> = set
            .iter()
            .map(|f| f.selected_indices().next().unwrap())
            .collect();
        assert_eq!(firsts, vec![2, 1, 0]);
    }

    #[test]
    fn test_caller_built_set_is_trusted_until_verified() {
        let set = PartitionFilterSet::new(vec![
            Filter::from_bools(&[true, false]),
            Filter::from_bools(&[true, true]),
        ])
        .unwrap();
        assert_eq!(set.num_partitions(), 2);
        assert!(set.verify_coverage().is_err());
    }

    #[test]
    fn test_config_defaults() {
        let config = RepartitionConfig::default();
        assert!(config.parallel);
        assert!(!config.verify_coverage);
        assert_eq!(
            RepartitionConfig::new().with_min_parallel_rows(10).min_parallel_rows,
            10
        );
    }
}
