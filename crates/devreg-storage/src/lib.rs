//! Key-value storage abstraction for device records.
//!
//! Provides the [`KvBackend`] / [`KvConnection`] traits defining the storage
//! contract, plus three backends: [`RedisBackend`] (the production store),
//! [`SqliteBackend`] (an embedded file) and [`InMemoryBackend`] (tests).
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`traits`]: KvBackend and KvConnection trait definitions
//! - [`memory`]: InMemoryBackend implementation
//! - [`redis_kv`]: RedisBackend implementation
//! - [`schema`]: SQLite schema and migration setup
//! - [`sqlite`]: SqliteBackend implementation

pub mod error;
pub mod memory;
pub mod redis_kv;
pub mod schema;
pub mod sqlite;
pub mod traits;

use std::sync::Arc;

pub use error::StorageError;
pub use memory::InMemoryBackend;
pub use redis_kv::RedisBackend;
pub use sqlite::SqliteBackend;
pub use traits::{KvBackend, KvConnection};

/// Builds a backend from a store URL.
///
/// - `redis://...` / `rediss://...` → [`RedisBackend`]
/// - `sqlite://<path>` → [`SqliteBackend`]
/// - `memory://` → [`InMemoryBackend`]
pub fn open_backend(url: &str) -> Result<Arc<dyn KvBackend>, StorageError> {
    let (scheme, rest) = url
        .split_once("://")
        .ok_or_else(|| StorageError::InvalidUrl(format!("missing scheme in '{}'", url)))?;

    let backend: Arc<dyn KvBackend> = match scheme {
        "redis" | "rediss" => Arc::new(RedisBackend::new(url)?),
        "sqlite" => {
            if rest.is_empty() {
                return Err(StorageError::InvalidUrl("sqlite url needs a path".to_string()));
            }
            Arc::new(SqliteBackend::new(rest)?)
        }
        "memory" => Arc::new(InMemoryBackend::new()),
        other => {
            return Err(StorageError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                other
            )))
        }
    };

    tracing::debug!(backend = backend.name(), "opened store backend");
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_backend_by_scheme() {
        assert_eq!(open_backend("memory://").unwrap().name(), "memory");
        assert_eq!(open_backend("redis://localhost:6379/0").unwrap().name(), "redis");

        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("kv.db").display());
        assert_eq!(open_backend(&url).unwrap().name(), "sqlite");
    }

    #[test]
    fn rejects_unknown_or_missing_scheme() {
        assert!(matches!(
            open_backend("postgres://localhost/db"),
            Err(StorageError::InvalidUrl(_))
        ));
        assert!(matches!(open_backend("localhost:6379"), Err(StorageError::InvalidUrl(_))));
        assert!(matches!(open_backend("sqlite://"), Err(StorageError::InvalidUrl(_))));
    }
}
