//! Error types for lazy linear algebra
//!
//! Recoverable failures (building containers from raw data) go through [`Error`].
//! Shape mismatches inside an expression are precondition violations and panic
//! through [`precondition!`] after logging at `error` level.

use thiserror::Error;

/// Core error type for container construction and validation
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Operand shapes do not conform
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// Element index outside of the container
    #[error("Index {index} out of bounds for dimension of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create an error for a buffer whose length does not match the requested shape
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InvalidInput(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// Create an error for two non-conforming shapes
    pub fn shape_mismatch(expected: (usize, usize), actual: (usize, usize)) -> Self {
        Self::ShapeMismatch { expected, actual }
    }

    /// Create an error for an index that does not fit a dimension
    pub fn out_of_bounds(index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds { index, len }
    }
}

/// Panics with `msg` after logging it, unless `cond` holds.
///
/// Used for shape checks that involve dynamic dimensions; the static half of
/// the same checks lives in [`crate::constraints`].
macro_rules! precondition {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            let msg = format!($($arg)+);
            log::error!("precondition violated: {msg}");
            panic!("{msg}");
        }
    };
}
pub(crate) use precondition;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidParameter("rows must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid parameter: rows must be positive");

        let err = Error::InvalidInput("ragged rows".to_string());
        assert_eq!(err.to_string(), "Invalid input: ragged rows");

        let err = Error::ShapeMismatch {
            expected: (2, 3),
            actual: (3, 2),
        };
        assert_eq!(err.to_string(), "Shape mismatch: expected (2, 3), got (3, 2)");

        let err = Error::IndexOutOfBounds { index: 7, len: 4 };
        assert_eq!(err.to_string(), "Index 7 out of bounds for dimension of length 4");
    }

    #[test]
    fn test_error_helper_functions() {
        let err = Error::size_mismatch(12, 10, "dense matrix buffer");
        assert_eq!(
            err.to_string(),
            "Invalid input: Size mismatch in dense matrix buffer: expected 12, got 10"
        );

        match Error::shape_mismatch((4, 4), (4, 5)) {
            Error::ShapeMismatch { expected, actual } => {
                assert_eq!(expected, (4, 4));
                assert_eq!(actual, (4, 5));
            }
            _ => panic!("Wrong error type"),
        }

        match Error::out_of_bounds(3, 3) {
            Error::IndexOutOfBounds { index, len } => {
                assert_eq!(index, 3);
                assert_eq!(len, 3);
            }
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_error_from_anyhow() {
        let anyhow_err = anyhow::anyhow!("custom error message");
        let err: Error = anyhow_err.into();

        match err {
            Error::Other(_) => {
                assert!(err.to_string().contains("custom error message"));
            }
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_precondition_passes_through() {
        precondition!(2 + 2 == 4, "arithmetic is broken");
    }

    #[test]
    #[should_panic(expected = "rows differ: 2 vs 3")]
    fn test_precondition_panics_with_message() {
        precondition!(2 == 3, "rows differ: {} vs {}", 2, 3);
    }
}
