//! Error types for spanlab.

use thiserror::Error;

/// Result type for spanlab operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for spanlab operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Bad setup: unknown voting mode, unknown closure policy, negative degree.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed operation-log line. Aborts the replay.
    #[error("{message} on line {line} of {file}")]
    Op {
        /// Name of the log being replayed
        file: String,
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },

    /// Parse error outside the operation log (example files, config values).
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The labeling cannot be expressed in the requested output format.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the corpus model.
    #[error(transparent)]
    Core(#[from] spanlab_core::Error),

    /// TOML config could not be deserialized.
    #[error("Config file error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create an operation-log error pinned to a line.
    pub fn op(file: impl Into<String>, line: usize, msg: impl Into<String>) -> Self {
        Error::Op {
            file: file.into(),
            line,
            message: msg.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Create an unsupported-operation error.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Error::Unsupported(msg.into())
    }
}
