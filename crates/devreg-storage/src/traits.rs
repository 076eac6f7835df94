//! The [`KvBackend`] and [`KvConnection`] traits defining the storage contract.
//!
//! Two-level API design:
//! - A **backend** is long-lived and shared by every request. It knows how to
//!   reach the store but holds no open connection itself.
//! - A **connection** is acquired from the backend for the span of one
//!   request and released when dropped, on every exit path.
//!
//! All backends (Redis, SQLite, in-memory) implement both traits, so the
//! server never depends on which store sits behind it.

use async_trait::async_trait;

use crate::error::StorageError;

/// A key-value store that hands out per-request connections.
#[async_trait]
pub trait KvBackend: Send + Sync {
    /// Short label for logs (e.g. "redis", "sqlite", "memory").
    fn name(&self) -> &'static str;

    /// Opens a connection scoped to the caller.
    ///
    /// The connection is closed when the returned box is dropped.
    async fn connect(&self) -> Result<Box<dyn KvConnection>, StorageError>;
}

/// The four primitive operations over string keys and string values.
#[async_trait]
pub trait KvConnection: Send {
    /// Returns the value at `key`, or `None` if nothing is stored there.
    async fn get(&mut self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` at `key`, overwriting any previous value.
    async fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Deleting an absent key is not an error.
    async fn delete(&mut self, key: &str) -> Result<(), StorageError>;

    /// Lists keys matching a glob `pattern` (`*`, `?`, `[...]`).
    ///
    /// Order is unspecified and the result is not a consistent snapshot:
    /// keys written or removed concurrently may or may not appear.
    async fn keys(&mut self, pattern: &str) -> Result<Vec<String>, StorageError>;
}
