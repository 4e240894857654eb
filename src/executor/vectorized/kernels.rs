//! Filter kernels over contiguous value buffers.
//!
//! Each kernel allocates its output once, sized to the number of selected
//! rows, then compacts the selected values in a single left-to-right pass.

use crate::error::{Result, ShuffleError};

use super::Filter;

/// Allocates an empty vector with room for exactly `capacity` elements.
///
/// # Errors
///
/// Returns [`ShuffleError::AllocationFailed`] if the reservation fails.
pub fn try_with_capacity<T>(capacity: usize) -> Result<Vec<T>> {
    let mut out = Vec::new();
    out.try_reserve_exact(capacity)
        .map_err(|_| ShuffleError::allocation::<T>(capacity))?;
    Ok(out)
}

/// Allocates a vector of `len` copies of `value`.
///
/// # Errors
///
/// Returns [`ShuffleError::AllocationFailed`] if the reservation fails.
pub fn try_filled<T: Clone>(len: usize, value: T) -> Result<Vec<T>> {
    let mut out = try_with_capacity(len)?;
    out.resize(len, value);
    Ok(out)
}

/// Keeps the values whose mask byte is non-zero, preserving order.
///
/// # Errors
///
/// Returns an error if the filter length differs from `values.len()` or the
/// output cannot be allocated.
pub fn filter_fixed<T: Copy>(values: &[T], filter: &Filter) -> Result<Vec<T>> {
    filter.check_len(values.len())?;
    let selected = filter.count_selected();
    let mut out = try_with_capacity(selected)?;

    if selected == values.len() {
        out.extend_from_slice(values);
    } else if selected > 0 {
        out.extend(
            values
                .iter()
                .zip(filter.as_bytes())
                .filter(|(_, &keep)| keep != 0)
                .map(|(v, _)| *v),
        );
    }
    Ok(out)
}
