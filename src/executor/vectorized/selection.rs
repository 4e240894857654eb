//! Byte-mask selection vectors.

use crate::error::{Result, ShuffleError};

/// Selection vector over the rows of a block.
///
/// One byte per row, non-zero meaning "selected". A fixed-length mask keeps
/// the filter pass a single linear scan, unlike an index list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    mask: Vec<u8>,
}

impl Filter {
    /// Creates a filter of `len` rows with nothing selected.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Filter { mask: vec![0; len] }
    }

    /// Creates a filter of `len` rows with every row selected.
    #[must_use]
    pub fn all(len: usize) -> Self {
        Filter { mask: vec![1; len] }
    }

    /// Wraps a raw byte mask.
    #[must_use]
    pub fn from_mask(mask: Vec<u8>) -> Self {
        Filter { mask }
    }

    /// Builds a filter from boolean flags.
    #[must_use]
    pub fn from_bools(flags: &[bool]) -> Self {
        flags.iter().copied().collect()
    }

    /// Returns the number of rows the filter covers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mask.len()
    }

    /// Returns true if the filter covers no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mask.is_empty()
    }

    /// Marks `row` as selected or not.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    pub fn set(&mut self, row: usize, selected: bool) {
        self.mask[row] = u8::from(selected);
    }

    /// Returns whether `row` is selected. Out-of-range rows are unselected.
    #[must_use]
    pub fn is_selected(&self, row: usize) -> bool {
        self.mask.get(row).is_some_and(|&b| b != 0)
    }

    /// Counts the selected rows.
    #[must_use]
    pub fn count_selected(&self) -> usize {
        self.mask.iter().filter(|&&b| b != 0).count()
    }

    /// Returns the raw byte mask.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.mask
    }

    /// Iterates over the selected row indices in ascending order.
    pub fn selected_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.mask
            .iter()
            .enumerate()
            .filter(|(_, &b)| b != 0)
            .map(|(i, _)| i)
    }

    /// Checks that the filter covers exactly `rows` rows.
    ///
    /// # Errors
    ///
    /// Returns [`ShuffleError::FilterLengthMismatch`] otherwise.
    pub fn check_len(&self, rows: usize) -> Result<()> {
        if self.mask.len() == rows {
            Ok(())
        } else {
            Err(ShuffleError::FilterLengthMismatch {
                expected: rows,
                actual: self.mask.len(),
            })
        }
    }
}

impl FromIterator<bool> for Filter {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Filter {
            mask: iter.into_iter().map(u8::from).collect(),
        }
    }
}
