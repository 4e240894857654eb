//! Conversion between [`Block`] and Arrow `RecordBatch`.
//!
//! Partitioned blocks are handed to Arrow-speaking operators and transports
//! through these conversions. Values are copied in both directions.

use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, ArrowPrimitiveType, BooleanArray, Float32Array, Float64Array, Int32Array,
    Int64Array, PrimitiveArray, StringArray, UInt64Array, UInt8Array,
};
use arrow::datatypes::{
    Float32Type, Float64Type, Int32Type, Int64Type, UInt64Type, UInt8Type,
};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};

use crate::catalog::{Field, Schema};
use crate::error::{Result, ShuffleError};
use crate::storage::{Block, Column, NullableColumn};
use crate::types::DataType;

impl Block {
    /// Converts the block to an Arrow `RecordBatch`.
    ///
    /// # Errors
    ///
    /// Returns an error if Arrow rejects the assembled batch.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let arrays: Vec<ArrayRef> = self.columns().iter().map(column_to_array).collect();
        let options = RecordBatchOptions::new().with_row_count(Some(self.num_rows()));
        Ok(RecordBatch::try_new_with_options(
            Arc::new(self.schema().to_arrow()),
            arrays,
            &options,
        )?)
    }

    /// Builds a block from an Arrow `RecordBatch`.
    ///
    /// # Errors
    ///
    /// Returns an error if a column has an unsupported type, holds nulls
    /// while its field is declared non-nullable, or if the batch has rows but
    /// no columns to carry them.
    pub fn try_from_record_batch(batch: &RecordBatch) -> Result<Self> {
        if batch.num_columns() == 0 && batch.num_rows() > 0 {
            return Err(ShuffleError::SchemaMismatch(format!(
                "batch has {} rows but no columns",
                batch.num_rows()
            )));
        }
        let schema = Schema::from_arrow(&batch.schema())?;
        let columns = schema
            .fields()
            .iter()
            .zip(batch.columns())
            .map(|(field, array)| array_to_column(array.as_ref(), field))
            .collect::<Result<Vec<_>>>()?;
        Block::try_new(Arc::new(schema), columns)
    }
}

impl TryFrom<&RecordBatch> for Block {
    type Error = ShuffleError;

    fn try_from(batch: &RecordBatch) -> Result<Self> {
        Block::try_from_record_batch(batch)
    }
}

fn column_to_array(column: &Column) -> ArrayRef {
    match column {
        Column::Nullable(c) => values_to_array(c.nested(), Some(c.null_map())),
        other => values_to_array(other, None),
    }
}

fn values_to_array(column: &Column, nulls: Option<&[u8]>) -> ArrayRef {
    match column {
        Column::UInt8(v) => primitive_array::<UInt8Type>(v, nulls),
        Column::UInt64(v) => primitive_array::<UInt64Type>(v, nulls),
        Column::Int32(v) => primitive_array::<Int32Type>(v, nulls),
        Column::Int64(v) => primitive_array::<Int64Type>(v, nulls),
        Column::Float32(v) => primitive_array::<Float32Type>(v, nulls),
        Column::Float64(v) => primitive_array::<Float64Type>(v, nulls),
        Column::Bool(v) => {
            let array: BooleanArray = match nulls {
                None => BooleanArray::from(v.clone()),
                Some(nulls) => v
                    .iter()
                    .zip(nulls)
                    .map(|(&b, &null)| (null == 0).then_some(b))
                    .collect(),
            };
            Arc::new(array)
        }
        Column::String(c) => {
            let array: StringArray = match nulls {
                None => StringArray::from_iter_values(c.iter()),
                Some(nulls) => c
                    .iter()
                    .zip(nulls)
                    .map(|(s, &null)| (null == 0).then_some(s))
                    .collect(),
            };
            Arc::new(array)
        }
        Column::Nullable(c) => values_to_array(c.nested(), Some(c.null_map())),
    }
}

fn primitive_array<T: ArrowPrimitiveType>(
    values: &[T::Native],
    nulls: Option<&[u8]>,
) -> ArrayRef {
    let array: PrimitiveArray<T> = match nulls {
        None => PrimitiveArray::from_iter_values(values.iter().copied()),
        Some(nulls) => values
            .iter()
            .zip(nulls)
            .map(|(&v, &null)| (null == 0).then_some(v))
            .collect(),
    };
    Arc::new(array)
}

fn downcast<'a, A: Array + 'static>(array: &'a dyn Array, field: &Field) -> Result<&'a A> {
    array
        .as_any()
        .downcast_ref::<A>()
        .ok_or_else(|| ShuffleError::TypeError {
            expected: field.data_type.to_arrow().to_string(),
            actual: array.data_type().to_string(),
        })
}

fn array_to_column(array: &dyn Array, field: &Field) -> Result<Column> {
    let values = match field.data_type {
        DataType::UInt8 => Column::UInt8(downcast::<UInt8Array>(array, field)?.values().to_vec()),
        DataType::UInt64 => {
            Column::UInt64(downcast::<UInt64Array>(array, field)?.values().to_vec())
        }
        DataType::Int32 => Column::Int32(downcast::<Int32Array>(array, field)?.values().to_vec()),
        DataType::Int64 => Column::Int64(downcast::<Int64Array>(array, field)?.values().to_vec()),
        DataType::Float32 => {
            Column::Float32(downcast::<Float32Array>(array, field)?.values().to_vec())
        }
        DataType::Float64 => {
            Column::Float64(downcast::<Float64Array>(array, field)?.values().to_vec())
        }
        DataType::Bool => {
            Column::Bool(downcast::<BooleanArray>(array, field)?.values().iter().collect())
        }
        DataType::String => Column::String(
            downcast::<StringArray>(array, field)?
                .iter()
                .map(Option::unwrap_or_default)
                .collect(),
        ),
    };

    if field.nullable {
        let null_map = (0..array.len()).map(|i| u8::from(array.is_null(i))).collect();
        Ok(Column::Nullable(NullableColumn::from_parts(values, null_map)))
    } else if array.null_count() > 0 {
        Err(ShuffleError::SchemaMismatch(format!(
            "column '{}' is not nullable but holds {} nulls",
            field.name,
            array.null_count()
        )))
    } else {
        Ok(values)
    }
}
