//! Data types and scalar values.

mod value;

pub use value::{DataType, Value};
