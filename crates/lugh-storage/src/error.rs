//! Storage error types

use thiserror::Error;

/// Result type alias for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Storage-specific error types
#[derive(Error, Debug)]
pub enum StorageError {
    #[error(transparent)]
    Core(#[from] lugh_core::Error),

    #[error("Invalid statement #{index}: {reason}")]
    InvalidStatement { index: usize, reason: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rio_turtle::TurtleError> for StorageError {
    fn from(e: rio_turtle::TurtleError) -> Self {
        StorageError::Parse(e.to_string())
    }
}
