//! Nullable wrapper over a non-nullable column.

use crate::error::Result;
use crate::executor::vectorized::kernels::filter_fixed;
use crate::executor::vectorized::Filter;
use crate::storage::Column;

/// A nested column plus a byte null map (non-zero = null).
///
/// Null rows still occupy a slot in the nested column, so both parts always
/// have the same length. The value in a null slot is unspecified.
#[derive(Debug, Clone, PartialEq)]
pub struct NullableColumn {
    nested: Box<Column>,
    null_map: Vec<u8>,
}

impl NullableColumn {
    /// Wraps `nested` with a null map.
    ///
    /// Callers guarantee that `nested` is not itself nullable and that both
    /// parts have the same length.
    pub(crate) fn from_parts(nested: Column, null_map: Vec<u8>) -> Self {
        debug_assert!(!nested.is_nullable());
        debug_assert_eq!(nested.len(), null_map.len());
        NullableColumn {
            nested: Box::new(nested),
            null_map,
        }
    }

    /// Returns the nested value column.
    #[must_use]
    pub fn nested(&self) -> &Column {
        &self.nested
    }

    pub(crate) fn nested_mut(&mut self) -> &mut Column {
        &mut self.nested
    }

    /// Returns the null map.
    #[must_use]
    pub fn null_map(&self) -> &[u8] {
        &self.null_map
    }

    pub(crate) fn push_null_flag(&mut self, is_null: bool) {
        self.null_map.push(u8::from(is_null));
    }

    /// Returns whether `index` is null.
    #[must_use]
    pub fn is_null(&self, index: usize) -> bool {
        self.null_map.get(index).is_some_and(|&b| b != 0)
    }

    /// Returns the number of nulls.
    #[must_use]
    pub fn null_count(&self) -> usize {
        self.null_map.iter().filter(|&&b| b != 0).count()
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.null_map.len()
    }

    /// Returns true if the column has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.null_map.is_empty()
    }

    /// Nested bytes plus one byte per row for the null map.
    #[must_use]
    pub fn bytes(&self) -> usize {
        self.nested.bytes() + self.null_map.len()
    }

    /// Filters the nested column and the null map with the same selection.
    ///
    /// # Errors
    ///
    /// Returns an error on a length mismatch or allocation failure.
    pub fn filter(&self, filter: &Filter) -> Result<Self> {
        let nested = self.nested.filter(filter)?;
        let null_map = filter_fixed(&self.null_map, filter)?;
        Ok(NullableColumn::from_parts(nested, null_map))
    }
}
