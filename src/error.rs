//! Error types for imgcast

use crate::dtype::DType;
use thiserror::Error;

/// Result type alias using imgcast's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in imgcast operations
#[derive(Error, Debug)]
pub enum Error {
    /// Conversion between dtypes outside the supported set
    #[error("Cannot convert from {from} to {to}")]
    UnsupportedConversion {
        /// Source dtype
        from: DType,
        /// Target dtype
        to: DType,
    },

    /// Floating point input outside the normalized [-1, 1] range
    #[error("Images of type {dtype} must be between -1 and 1, got range [{min}, {max}]")]
    OutOfRange {
        /// Dtype of the offending image
        dtype: DType,
        /// Smallest value found in the image
        min: f64,
        /// Largest value found in the image
        max: f64,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Element count does not match the requested shape
    #[error("Shape mismatch: shape requires {expected} elements, got {got}")]
    ShapeMismatch {
        /// Element count implied by the shape
        expected: usize,
        /// Actual element count
        got: usize,
    },

    /// Typed access against an image of a different dtype
    #[error("DType mismatch: expected {expected}, got {got}")]
    DTypeMismatch {
        /// Dtype requested by the caller
        expected: DType,
        /// Actual dtype of the image
        got: DType,
    },
}

impl Error {
    /// Create an unsupported conversion error
    pub fn unsupported_conversion(from: DType, to: DType) -> Self {
        Self::UnsupportedConversion { from, to }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }
}
