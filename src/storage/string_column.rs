//! Variable-width UTF-8 column.

use crate::error::Result;
use crate::executor::vectorized::kernels::{try_filled, try_with_capacity};
use crate::executor::vectorized::Filter;

/// Bytes accounted per row for the offsets array.
const OFFSET_BYTES: usize = std::mem::size_of::<u64>();

/// Strings stored back to back in one byte buffer.
///
/// `offsets[i]` is the end of row `i` in `chars`; row `i` starts where row
/// `i - 1` ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringColumn {
    chars: Vec<u8>,
    offsets: Vec<usize>,
}

impl StringColumn {
    /// Creates a new empty column.
    #[must_use]
    pub fn new() -> Self {
        StringColumn::default()
    }

    /// Creates a column of `len` empty strings.
    ///
    /// # Errors
    ///
    /// Returns an error if the offsets cannot be allocated.
    pub fn with_len(len: usize) -> Result<Self> {
        Ok(StringColumn {
            chars: Vec::new(),
            offsets: try_filled(len, 0)?,
        })
    }

    /// Appends a string.
    pub fn push(&mut self, value: &str) {
        self.chars.extend_from_slice(value.as_bytes());
        self.offsets.push(self.chars.len());
    }

    /// Gets a string by row index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        let end = *self.offsets.get(index)?;
        let start = self.row_start(index);
        std::str::from_utf8(&self.chars[start..end]).ok()
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Returns true if the column has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Logical size: string bytes plus one offset per row.
    #[must_use]
    pub fn bytes(&self) -> usize {
        self.chars.len() + self.offsets.len() * OFFSET_BYTES
    }

    /// Iterates over the strings in row order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    fn row_start(&self, index: usize) -> usize {
        if index == 0 {
            0
        } else {
            self.offsets[index - 1]
        }
    }

    /// Returns a new column holding the selected rows in their original order.
    ///
    /// Both buffers are sized exactly before copying.
    ///
    /// # Errors
    ///
    /// Returns an error on a length mismatch or allocation failure.
    pub fn filter(&self, filter: &Filter) -> Result<Self> {
        filter.check_len(self.len())?;

        let mut rows = 0;
        let mut char_bytes = 0;
        for (i, _) in filter.as_bytes().iter().enumerate().filter(|(_, &b)| b != 0) {
            rows += 1;
            char_bytes += self.offsets[i] - self.row_start(i);
        }

        let mut chars = try_with_capacity(char_bytes)?;
        let mut offsets = try_with_capacity(rows)?;
        let mut start = 0;
        for (&end, &keep) in self.offsets.iter().zip(filter.as_bytes()) {
            if keep != 0 {
                chars.extend_from_slice(&self.chars[start..end]);
                offsets.push(chars.len());
            }
            start = end;
        }
        Ok(StringColumn { chars, offsets })
    }
}

impl<'a> FromIterator<&'a str> for StringColumn {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut column = StringColumn::new();
        for s in iter {
            column.push(s);
        }
        column
    }
}
