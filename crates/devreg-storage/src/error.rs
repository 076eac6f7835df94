//! Storage error types for devreg-storage.
//!
//! [`StorageError`] separates "the store cannot be reached" from "the store
//! rejected an operation" so the HTTP layer can map them to different status
//! codes.

use thiserror::Error;

/// Errors produced by key-value store operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store could not be reached (connection refused, dropped, timed out).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store was reachable but the operation failed.
    #[error("store operation failed: {0}")]
    Backend(String),

    /// The store URL could not be understood.
    #[error("invalid store url: {0}")]
    InvalidUrl(String),

    /// A key pattern could not be compiled.
    #[error("invalid key pattern: {0}")]
    InvalidPattern(String),

    /// SQLite database error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Schema migration failed.
    #[error("migration error: {0}")]
    Migration(String),
}

impl From<redis::RedisError> for StorageError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_io_error()
            || err.is_connection_refusal()
            || err.is_connection_dropped()
            || err.is_timeout()
        {
            StorageError::Unavailable(err.to_string())
        } else {
            StorageError::Backend(err.to_string())
        }
    }
}
