//! Error types for spanlab-core.

use thiserror::Error;

/// Result type for spanlab-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for spanlab-core operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A span does not fit inside its document or parent span.
    #[error("Span out of bounds: {0}")]
    OutOfBounds(String),

    /// Two documents were registered under one id.
    #[error("Duplicate document id: {0}")]
    DuplicateDocument(String),
}

impl Error {
    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an out-of-bounds error.
    #[must_use]
    pub fn out_of_bounds(msg: impl Into<String>) -> Self {
        Self::OutOfBounds(msg.into())
    }
}
