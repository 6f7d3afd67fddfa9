use thiserror::Error;

use crate::{kernel::KernelKind, Orientation};

/// Result type used throughout this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned by matrix, vector and kernel operations.
///
/// Apart from [`Error::KernelUnavailable`] and [`Error::KernelFailure`], these are all violated
/// preconditions detected before any data is written. An operation that returns an error leaves
/// its operands untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// A matrix was requested with zero rows or zero columns.
    #[error("invalid matrix shape {rows}x{cols}; both dimensions must be non-zero")]
    InvalidShape { rows: usize, cols: usize },

    /// Nested row input where a row's length differs from the first row's.
    #[error("row {row} has {found} elements, expected {expected} (the length of row 0)")]
    RaggedInput {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A matrix was requested from an empty list of rows.
    #[error("cannot create a matrix from an empty list of rows")]
    EmptyInput,

    /// An element or range access outside of the matrix.
    #[error("index ({row}, {col}) is out of bounds for a {}x{} matrix", shape.0, shape.1)]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        shape: (usize, usize),
    },

    /// Two operands (or an operand and a declared size) have different lengths.
    #[error("length mismatch: {left} != {right}")]
    LengthMismatch { left: usize, right: usize },

    /// Matrix shapes are incompatible for the requested operation.
    #[error(
        "dimension mismatch: {}x{} and {}x{} are incompatible",
        left.0, left.1, right.0, right.1
    )]
    DimensionMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },

    /// Vector orientations do not permit the requested product.
    #[error("cannot compute the product of a {left:?} vector and a {right:?} vector")]
    OrientationError {
        left: Orientation,
        right: Orientation,
    },

    /// The operation is not defined for this operand.
    #[error("operation not applicable: {0}")]
    NotApplicable(&'static str),

    /// The requested kernel was not compiled into this build.
    #[error("the {0} kernel is not available in this build")]
    KernelUnavailable(KernelKind),

    /// The backing numeric routine reported a failure.
    #[error("{routine} failed: {message}")]
    KernelFailure {
        routine: &'static str,
        message: String,
    },
}

impl Error {
    pub(crate) fn kernel(routine: &'static str, message: impl Into<String>) -> Self {
        Self::KernelFailure {
            routine,
            message: message.into(),
        }
    }
}
