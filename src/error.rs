//! Error types for photocast.

use thiserror::Error;

/// Common error type for photocast.
#[derive(Error, Debug)]
pub enum PhotocastError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage could not allocate a fresh filename.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Result type alias for photocast operations.
pub type Result<T> = std::result::Result<T, PhotocastError>;
