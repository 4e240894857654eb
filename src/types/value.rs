//! Value and `DataType` definitions for blockshuffle.

use serde::{Deserialize, Serialize};

/// Supported physical column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// 8-bit unsigned integer.
    UInt8,
    /// 64-bit unsigned integer.
    UInt64,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 32-bit floating point.
    Float32,
    /// 64-bit floating point.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    String,
}

impl DataType {
    /// Returns the display name of the data type.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DataType::UInt8 => "UINT8",
            DataType::UInt64 => "UINT64",
            DataType::Int32 => "INT32",
            DataType::Int64 => "INT64",
            DataType::Float32 => "FLOAT32",
            DataType::Float64 => "FLOAT64",
            DataType::Bool => "BOOL",
            DataType::String => "STRING",
        }
    }

    /// Returns whether this type is a fixed-width type.
    #[must_use]
    pub fn is_fixed_width(&self) -> bool {
        self.byte_size().is_some()
    }

    /// Returns the byte size for fixed-width types.
    #[must_use]
    pub fn byte_size(&self) -> Option<usize> {
        match self {
            DataType::UInt64 | DataType::Int64 | DataType::Float64 => Some(8),
            DataType::Int32 | DataType::Float32 => Some(4),
            DataType::UInt8 | DataType::Bool => Some(1),
            DataType::String => None, // variable width
        }
    }

    /// Converts to an Arrow data type.
    #[must_use]
    pub fn to_arrow(&self) -> arrow::datatypes::DataType {
        match self {
            DataType::UInt8 => arrow::datatypes::DataType::UInt8,
            DataType::UInt64 => arrow::datatypes::DataType::UInt64,
            DataType::Int32 => arrow::datatypes::DataType::Int32,
            DataType::Int64 => arrow::datatypes::DataType::Int64,
            DataType::Float32 => arrow::datatypes::DataType::Float32,
            DataType::Float64 => arrow::datatypes::DataType::Float64,
            DataType::Bool => arrow::datatypes::DataType::Boolean,
            DataType::String => arrow::datatypes::DataType::Utf8,
        }
    }

    /// Converts from an Arrow data type.
    ///
    /// Returns None for unsupported Arrow types.
    #[must_use]
    pub fn from_arrow(arrow_type: &arrow::datatypes::DataType) -> Option<Self> {
        match arrow_type {
            arrow::datatypes::DataType::UInt8 => Some(DataType::UInt8),
            arrow::datatypes::DataType::UInt64 => Some(DataType::UInt64),
            arrow::datatypes::DataType::Int32 => Some(DataType::Int32),
            arrow::datatypes::DataType::Int64 => Some(DataType::Int64),
            arrow::datatypes::DataType::Float32 => Some(DataType::Float32),
            arrow::datatypes::DataType::Float64 => Some(DataType::Float64),
            arrow::datatypes::DataType::Boolean => Some(DataType::Bool),
            arrow::datatypes::DataType::Utf8 => Some(DataType::String),
            _ => None,
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single cell value, used to build and inspect columns row by row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// 8-bit unsigned integer value.
    UInt8(u8),
    /// 64-bit unsigned integer value.
    UInt64(u64),
    /// 32-bit signed integer value.
    Int32(i32),
    /// 64-bit signed integer value.
    Int64(i64),
    /// 32-bit floating point value.
    Float32(f32),
    /// 64-bit floating point value.
    Float64(f64),
    /// Boolean value.
    Bool(bool),
    /// String value.
    String(String),
    /// Null value.
    Null,
}

impl Value {
    /// Returns true if this value is null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the data type of this value, or None for Null.
    #[must_use]
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::UInt8(_) => Some(DataType::UInt8),
            Value::UInt64(_) => Some(DataType::UInt64),
            Value::Int32(_) => Some(DataType::Int32),
            Value::Int64(_) => Some(DataType::Int64),
            Value::Float32(_) => Some(DataType::Float32),
            Value::Float64(_) => Some(DataType::Float64),
            Value::Bool(_) => Some(DataType::Bool),
            Value::String(_) => Some(DataType::String),
            Value::Null => None,
        }
    }

    /// Attempts to extract a u64 value.
    #[must_use]
    pub fn as_uint64(&self) -> Option<u64> {
        match self {
            Value::UInt64(v) => Some(*v),
            _ => None,
        }
    }

    /// Attempts to extract an i64 value.
    #[must_use]
    pub fn as_int64(&self) -> Option<i64> {
        match self {
            Value::Int64(i) => Some(*i),
            _ => None,
        }
    }

    /// Attempts to extract an f64 value.
    #[must_use]
    pub fn as_float64(&self) -> Option<f64> {
        match self {
            Value::Float64(f) => Some(*f),
            _ => None,
        }
    }

    /// Attempts to extract a bool value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}
