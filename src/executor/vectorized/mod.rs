//! Vectorized filter primitives.
//!
//! This module provides the byte-mask selection vector and the kernels that
//! compact column buffers against it.

pub mod kernels;
mod selection;

pub use selection::Filter;
