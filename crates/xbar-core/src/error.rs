//! Error types for the crossbar state and propagation kernel.
//!
//! Organized by subsystem: [`StateError`] for construction and cell access,
//! [`KernelError`] for `compute`. All are local, synchronous conditions; none
//! are retried internally.

use thiserror::Error;

/// Errors from constructing or addressing a [`CrossbarState`](crate::CrossbarState).
#[derive(Clone, Debug, PartialEq, Error)]
pub enum StateError {
    /// The requested crossbar size is non-positive, or `size * size`
    /// overflows addressable memory.
    #[error("invalid crossbar dimension {size}: size must be at least 1")]
    InvalidDimension {
        /// The rejected size, widened so negative FFI inputs are preserved.
        size: i64,
    },
    /// A `(row, col)` lookup fell outside the grid.
    #[error("cell ({row}, {col}) out of bounds for {size}x{size} crossbar")]
    CellOutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
        /// Crossbar edge length.
        size: usize,
    },
    /// An initial condition is non-finite or not strictly positive.
    #[error("invalid initial {parameter}: {value}")]
    InvalidInitialCondition {
        /// `"conductance"` or `"temperature"`.
        parameter: &'static str,
        /// The rejected value.
        value: f64,
    },
}

/// Errors from a single propagation call.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum KernelError {
    /// An input or output vector length does not match the crossbar size.
    /// The crossbar state is left untouched.
    #[error("dimension mismatch: expected {expected} elements, got {actual}")]
    DimensionMismatch {
        /// Crossbar edge length.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },
    /// A non-finite value appeared in an input voltage (`row` is `None`) or in
    /// a cell's contribution or temperature (`row` is `Some`).
    ///
    /// Rows that degenerate are not committed; other rows of the same call
    /// may already have been.
    #[error("numeric degeneracy at row {row:?}, column {col}")]
    NumericDegeneracy {
        /// Offending row, or `None` when the input vector itself was rejected.
        row: Option<usize>,
        /// Offending column.
        col: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dimension_keeps_negative_size() {
        let err = StateError::InvalidDimension { size: -3 };
        assert!(err.to_string().contains("-3"));
    }

    #[test]
    fn mismatch_display_names_both_lengths() {
        let msg = KernelError::DimensionMismatch {
            expected: 4,
            actual: 5,
        }
        .to_string();
        assert!(msg.contains('4'));
        assert!(msg.contains('5'));
    }

    #[test]
    fn degeneracy_on_input_has_no_row() {
        let msg = KernelError::NumericDegeneracy { row: None, col: 2 }.to_string();
        assert!(msg.contains("None"));
        assert!(msg.contains("column 2"));
    }
}
