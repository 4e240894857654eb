//! Storage module for columnar data.
//!
//! This module provides the in-memory data model:
//! - Typed columns ([`Column`], [`StringColumn`], [`NullableColumn`])
//! - Blocks of equal-length named columns ([`Block`])
//! - Arrow `RecordBatch` conversion for blocks

mod arrow_interop;
mod block;
mod column;
mod nullable_column;
mod string_column;

pub use block::Block;
pub use column::Column;
pub use nullable_column::NullableColumn;
pub use string_column::StringColumn;
