//! Typed columnar storage.
//!
//! [`Column`] is a closed set of physical encodings. Every operation is a
//! `match` over the variants, so the filter path never goes through dynamic
//! dispatch.

use crate::error::{Result, ShuffleError};
use crate::executor::vectorized::kernels::{filter_fixed, try_filled};
use crate::executor::vectorized::Filter;
use crate::storage::{NullableColumn, StringColumn};
use crate::types::{DataType, Value};

/// A single column's values. Cloning performs a deep copy.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// 8-bit unsigned integers.
    UInt8(Vec<u8>),
    /// 64-bit unsigned integers.
    UInt64(Vec<u64>),
    /// 32-bit signed integers.
    Int32(Vec<i32>),
    /// 64-bit signed integers.
    Int64(Vec<i64>),
    /// 32-bit floats.
    Float32(Vec<f32>),
    /// 64-bit floats.
    Float64(Vec<f64>),
    /// Booleans, one byte each.
    Bool(Vec<bool>),
    /// Variable-width UTF-8 strings.
    String(StringColumn),
    /// Any of the above with a null map.
    Nullable(NullableColumn),
}

impl Column {
    /// Creates an empty column of the given type.
    #[must_use]
    pub fn new_empty(data_type: DataType, nullable: bool) -> Self {
        let column = match data_type {
            DataType::UInt8 => Column::UInt8(Vec::new()),
            DataType::UInt64 => Column::UInt64(Vec::new()),
            DataType::Int32 => Column::Int32(Vec::new()),
            DataType::Int64 => Column::Int64(Vec::new()),
            DataType::Float32 => Column::Float32(Vec::new()),
            DataType::Float64 => Column::Float64(Vec::new()),
            DataType::Bool => Column::Bool(Vec::new()),
            DataType::String => Column::String(StringColumn::new()),
        };
        if nullable {
            Column::Nullable(NullableColumn::from_parts(column, Vec::new()))
        } else {
            column
        }
    }

    /// Creates a column of `len` default values (zero, `false`, empty string).
    ///
    /// Nullable columns start with every row non-null.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffers cannot be allocated.
    pub fn with_len(data_type: DataType, nullable: bool, len: usize) -> Result<Self> {
        let column = match data_type {
            DataType::UInt8 => Column::UInt8(try_filled(len, 0)?),
            DataType::UInt64 => Column::UInt64(try_filled(len, 0)?),
            DataType::Int32 => Column::Int32(try_filled(len, 0)?),
            DataType::Int64 => Column::Int64(try_filled(len, 0)?),
            DataType::Float32 => Column::Float32(try_filled(len, 0.0)?),
            DataType::Float64 => Column::Float64(try_filled(len, 0.0)?),
            DataType::Bool => Column::Bool(try_filled(len, false)?),
            DataType::String => Column::String(StringColumn::with_len(len)?),
        };
        if nullable {
            Ok(Column::Nullable(NullableColumn::from_parts(
                column,
                try_filled(len, 0)?,
            )))
        } else {
            Ok(column)
        }
    }

    /// Builds a column from row values.
    ///
    /// # Errors
    ///
    /// Returns an error if a value does not match `data_type`, or is null in
    /// a non-nullable column.
    pub fn from_values(
        data_type: DataType,
        nullable: bool,
        values: impl IntoIterator<Item = Value>,
    ) -> Result<Self> {
        let mut column = Column::new_empty(data_type, nullable);
        for value in values {
            column.push(value)?;
        }
        Ok(column)
    }

    /// Returns the element type. For nullable columns, the nested type.
    #[must_use]
    pub fn data_type(&self) -> DataType {
        match self {
            Column::UInt8(_) => DataType::UInt8,
            Column::UInt64(_) => DataType::UInt64,
            Column::Int32(_) => DataType::Int32,
            Column::Int64(_) => DataType::Int64,
            Column::Float32(_) => DataType::Float32,
            Column::Float64(_) => DataType::Float64,
            Column::Bool(_) => DataType::Bool,
            Column::String(_) => DataType::String,
            Column::Nullable(c) => c.nested().data_type(),
        }
    }

    /// Returns whether the column carries a null map.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        matches!(self, Column::Nullable(_))
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Column::UInt8(v) => v.len(),
            Column::UInt64(v) => v.len(),
            Column::Int32(v) => v.len(),
            Column::Int64(v) => v.len(),
            Column::Float32(v) => v.len(),
            Column::Float64(v) => v.len(),
            Column::Bool(v) => v.len(),
            Column::String(c) => c.len(),
            Column::Nullable(c) => c.len(),
        }
    }

    /// Returns true if the column has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the logical size of the column's data in bytes.
    ///
    /// Fixed-width columns report `width * len`, so filtering a column into
    /// disjoint parts conserves the total exactly.
    #[must_use]
    pub fn bytes(&self) -> usize {
        match self {
            Column::String(c) => c.bytes(),
            Column::Nullable(c) => c.bytes(),
            fixed => fixed.data_type().byte_size().unwrap_or(0) * fixed.len(),
        }
    }

    /// Gets a value by row index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Value> {
        match self {
            Column::UInt8(v) => v.get(index).map(|&x| Value::UInt8(x)),
            Column::UInt64(v) => v.get(index).map(|&x| Value::UInt64(x)),
            Column::Int32(v) => v.get(index).map(|&x| Value::Int32(x)),
            Column::Int64(v) => v.get(index).map(|&x| Value::Int64(x)),
            Column::Float32(v) => v.get(index).map(|&x| Value::Float32(x)),
            Column::Float64(v) => v.get(index).map(|&x| Value::Float64(x)),
            Column::Bool(v) => v.get(index).map(|&x| Value::Bool(x)),
            Column::String(c) => c.get(index).map(|s| Value::String(s.to_string())),
            Column::Nullable(c) => {
                if index >= c.len() {
                    None
                } else if c.is_null(index) {
                    Some(Value::Null)
                } else {
                    c.nested().get(index)
                }
            }
        }
    }

    /// Appends a value to the column.
    ///
    /// # Errors
    ///
    /// Returns [`ShuffleError::TypeError`] if the value's type does not match.
    pub fn push(&mut self, value: Value) -> Result<()> {
        match (self, value) {
            (Column::UInt8(v), Value::UInt8(x)) => v.push(x),
            (Column::UInt64(v), Value::UInt64(x)) => v.push(x),
            (Column::Int32(v), Value::Int32(x)) => v.push(x),
            (Column::Int64(v), Value::Int64(x)) => v.push(x),
            (Column::Float32(v), Value::Float32(x)) => v.push(x),
            (Column::Float64(v), Value::Float64(x)) => v.push(x),
            (Column::Bool(v), Value::Bool(x)) => v.push(x),
            (Column::String(c), Value::String(s)) => c.push(&s),
            (Column::Nullable(c), Value::Null) => {
                c.nested_mut().push_default();
                c.push_null_flag(true);
            }
            (Column::Nullable(c), value) => {
                c.nested_mut().push(value)?;
                c.push_null_flag(false);
            }
            (column, value) => {
                return Err(ShuffleError::TypeError {
                    expected: column.data_type().name().to_string(),
                    actual: value
                        .data_type()
                        .map_or("NULL", |dt| dt.name())
                        .to_string(),
                });
            }
        }
        Ok(())
    }

    /// Appends the type's default value. Only used for the null slots of
    /// nullable columns, whose nested column is never nullable.
    fn push_default(&mut self) {
        match self {
            Column::UInt8(v) => v.push(0),
            Column::UInt64(v) => v.push(0),
            Column::Int32(v) => v.push(0),
            Column::Int64(v) => v.push(0),
            Column::Float32(v) => v.push(0.0),
            Column::Float64(v) => v.push(0.0),
            Column::Bool(v) => v.push(false),
            Column::String(c) => c.push(""),
            Column::Nullable(c) => {
                c.nested_mut().push_default();
                c.push_null_flag(true);
            }
        }
    }

    /// Returns a new column containing the rows selected by `filter`, in
    /// ascending row order.
    ///
    /// The source is left untouched and can be filtered again with a
    /// different mask. The result never shares storage with the source,
    /// even when every row is selected.
    ///
    /// # Errors
    ///
    /// Returns [`ShuffleError::FilterLengthMismatch`] if the filter length
    /// differs from the column length, or [`ShuffleError::AllocationFailed`]
    /// if the output cannot be allocated.
    pub fn filter(&self, filter: &Filter) -> Result<Column> {
        Ok(match self {
            Column::UInt8(v) => Column::UInt8(filter_fixed(v, filter)?),
            Column::UInt64(v) => Column::UInt64(filter_fixed(v, filter)?),
            Column::Int32(v) => Column::Int32(filter_fixed(v, filter)?),
            Column::Int64(v) => Column::Int64(filter_fixed(v, filter)?),
            Column::Float32(v) => Column::Float32(filter_fixed(v, filter)?),
            Column::Float64(v) => Column::Float64(filter_fixed(v, filter)?),
            Column::Bool(v) => Column::Bool(filter_fixed(v, filter)?),
            Column::String(c) => Column::String(c.filter(filter)?),
            Column::Nullable(c) => Column::Nullable(c.filter(filter)?),
        })
    }
}

impl From<Vec<u8>> for Column {
    fn from(values: Vec<u8>) -> Self {
        Column::UInt8(values)
    }
}

impl From<Vec<u64>> for Column {
    fn from(values: Vec<u64>) -> Self {
        Column::UInt64(values)
    }
}

impl From<Vec<i32>> for Column {
    fn from(values: Vec<i32>) -> Self {
        Column::Int32(values)
    }
}

impl From<Vec<i64>> for Column {
    fn from(values: Vec<i64>) -> Self {
        Column::Int64(values)
    }
}

impl From<Vec<f32>> for Column {
    fn from(values: Vec<f32>) -> Self {
        Column::Float32(values)
    }
}

impl From<Vec<f64>> for Column {
    fn from(values: Vec<f64>) -> Self {
        Column::Float64(values)
    }
}

impl From<Vec<bool>> for Column {
    fn from(values: Vec<bool>) -> Self {
        Column::Bool(values)
    }
}

impl From<Vec<&str>> for Column {
    fn from(values: Vec<&str>) -> Self {
        Column::String(values.into_iter().collect())
    }
}

impl From<StringColumn> for Column {
    fn from(column: StringColumn) -> Self {
        Column::String(column)
    }
}
