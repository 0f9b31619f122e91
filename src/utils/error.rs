// src/utils/error.rs

use thiserror::Error;

/// The primary error type for all fallible operations in the codec.
///
/// Transform-engine misuse (wrong leaf size, coefficient counts that do not
/// match the replayed partition) is a programmer error and panics instead.
#[derive(Error, Debug)]
pub enum WtfError {
    /// An error occurred during I/O operations (file not found, truncated stream, ...).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The container's format tag is neither Dense (0) nor Mixed (1).
    #[error("Unsupported container format tag: {0}")]
    UnsupportedFormat(u8),

    /// A header field is negative or inconsistent with the others.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// The container body is malformed (e.g. mixed-line offsets out of order).
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// An invalid argument was provided to a function.
    #[error("Invalid argument: {0}")]
    InvalidArg(String),

    /// Occurs when a line or plane length does not match the expected length.
    #[error("Dimension mismatch: expected {expected}, but got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl WtfError {
    /// Returns true if this error came from the underlying reader or writer
    /// rather than from malformed input.
    pub fn is_io(&self) -> bool {
        matches!(self, WtfError::Io(_))
    }
}

/// A specialized `Result` type for codec operations.
pub type Result<T> = std::result::Result<T, WtfError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_errors_are_distinguishable() {
        let err: WtfError = io::Error::new(io::ErrorKind::UnexpectedEof, "short read").into();
        assert!(err.is_io());
        assert!(!WtfError::UnsupportedFormat(7).is_io());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            WtfError::UnsupportedFormat(9).to_string(),
            "Unsupported container format tag: 9"
        );
        let err = WtfError::DimensionMismatch {
            expected: 4,
            actual: 5,
        };
        assert_eq!(err.to_string(), "Dimension mismatch: expected 4, but got 5");
    }
}
