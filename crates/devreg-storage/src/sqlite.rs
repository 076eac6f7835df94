//! SQLite implementation of [`KvBackend`].
//!
//! [`SqliteBackend`] keeps every key in a single `kv` table. Each call to
//! [`KvBackend::connect`] opens its own `rusqlite::Connection`, which is
//! closed when the returned connection is dropped.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::StorageError;
use crate::schema::{open_connection, open_database};
use crate::traits::{KvBackend, KvConnection};

/// SQLite-backed key-value backend.
#[derive(Debug, Clone)]
pub struct SqliteBackend {
    path: String,
}

impl SqliteBackend {
    /// Creates the database at `path` if needed and applies migrations.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let _conn = open_database(path)?;
        Ok(SqliteBackend {
            path: path.to_string(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[async_trait]
impl KvBackend for SqliteBackend {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn connect(&self) -> Result<Box<dyn KvConnection>, StorageError> {
        let conn = open_connection(&self.path)
            .map_err(|e| StorageError::Unavailable(format!("{}: {}", self.path, e)))?;
        Ok(Box::new(SqliteConnection { conn }))
    }
}

struct SqliteConnection {
    conn: Connection,
}

#[async_trait]
impl KvConnection for SqliteConnection {
    async fn get(&mut self, key: &str) -> Result<Option<String>, StorageError> {
        tracing::debug!(backend = "sqlite", key, "GET");
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    async fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        tracing::debug!(backend = "sqlite", key, len = value.len(), "SET");
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    async fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        tracing::debug!(backend = "sqlite", key, "DEL");
        self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    async fn keys(&mut self, pattern: &str) -> Result<Vec<String>, StorageError> {
        tracing::debug!(backend = "sqlite", pattern, "KEYS");
        let mut stmt = self.conn.prepare("SELECT key FROM kv WHERE key GLOB ?1")?;
        let rows = stmt.query_map(params![pattern], |row| row.get::<_, String>(0))?;

        let mut keys = Vec::new();
        for row in rows {
            keys.push(row?);
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_backend() -> (tempfile::TempDir, SqliteBackend) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devices.db");
        let backend = SqliteBackend::new(path.to_str().unwrap()).unwrap();
        (dir, backend)
    }

    #[tokio::test]
    async fn set_get_delete() {
        let (_dir, backend) = temp_backend();
        let mut conn = backend.connect().await.unwrap();

        assert_eq!(conn.get("device:r1").await.unwrap(), None);
        conn.set("device:r1", "first").await.unwrap();
        conn.set("device:r1", "second").await.unwrap();
        assert_eq!(conn.get("device:r1").await.unwrap().as_deref(), Some("second"));

        conn.delete("device:r1").await.unwrap();
        conn.delete("device:r1").await.unwrap();
        assert_eq!(conn.get("device:r1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn values_persist_across_connections() {
        let (_dir, backend) = temp_backend();
        {
            let mut conn = backend.connect().await.unwrap();
            conn.set("device:persisted", "{}").await.unwrap();
        }
        let reopened = SqliteBackend::new(backend.path()).unwrap();
        let mut conn = reopened.connect().await.unwrap();
        assert_eq!(conn.get("device:persisted").await.unwrap().as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn connect_opens_existing_database_without_creating_one() {
        let (dir, backend) = temp_backend();
        {
            let mut conn = backend.connect().await.unwrap();
            conn.set("device:a", "1").await.unwrap();
        }

        std::fs::remove_file(backend.path()).unwrap();
        for suffix in ["-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", backend.path(), suffix));
        }

        let err = backend.connect().await.err().unwrap();
        assert!(matches!(err, StorageError::Unavailable(_)));
        assert!(!dir.path().join("devices.db").exists());
    }

    #[tokio::test]
    async fn keys_uses_glob_semantics() {
        let (_dir, backend) = temp_backend();
        let mut conn = backend.connect().await.unwrap();
        conn.set("device:a", "1").await.unwrap();
        conn.set("device:b", "2").await.unwrap();
        conn.set("devices", "3").await.unwrap();
        conn.set("other:a", "4").await.unwrap();

        let mut keys = conn.keys("device:*").await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["device:a".to_string(), "device:b".to_string()]);
    }
}
