//! Common error types for Kura

use thiserror::Error;

/// Common result type for Kura operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Kura services
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Location catalog could not be read or parsed
    #[error("Location catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique identifier already present in storage
    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
