//! In-memory implementation of [`KvBackend`].
//!
//! [`InMemoryBackend`] is a first-class backend for tests and throwaway local
//! runs. All connections from one backend share the same map, so a value set
//! through one connection is visible to every other.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use globset::GlobBuilder;

use crate::error::StorageError;
use crate::traits::{KvBackend, KvConnection};

/// In-memory key-value backend.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    entries: Arc<DashMap<String, String>>,
    open: Arc<AtomicUsize>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of connections currently checked out and not yet dropped.
    pub fn open_connections(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl KvBackend for InMemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn connect(&self) -> Result<Box<dyn KvConnection>, StorageError> {
        self.open.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(InMemoryConnection {
            entries: Arc::clone(&self.entries),
            open: Arc::clone(&self.open),
        }))
    }
}

/// A handle onto the shared map. Dropping it releases the connection count.
struct InMemoryConnection {
    entries: Arc<DashMap<String, String>>,
    open: Arc<AtomicUsize>,
}

impl Drop for InMemoryConnection {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl KvConnection for InMemoryConnection {
    async fn get(&mut self, key: &str) -> Result<Option<String>, StorageError> {
        tracing::debug!(backend = "memory", key, "GET");
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        tracing::debug!(backend = "memory", key, len = value.len(), "SET");
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        tracing::debug!(backend = "memory", key, "DEL");
        self.entries.remove(key);
        Ok(())
    }

    async fn keys(&mut self, pattern: &str) -> Result<Vec<String>, StorageError> {
        tracing::debug!(backend = "memory", pattern, "KEYS");
        // Redis globs have no notion of a path separator, so `*` spans `:` too.
        let matcher = GlobBuilder::new(pattern)
            .literal_separator(false)
            .backslash_escape(true)
            .case_insensitive(false)
            .build()
            .map_err(|e| StorageError::InvalidPattern(e.to_string()))?
            .compile_matcher();

        Ok(self
            .entries
            .iter()
            .filter(|entry| matcher.is_match(entry.key().as_str()))
            .map(|entry| entry.key().clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_missing_key_is_none() {
        let backend = InMemoryBackend::new();
        let mut conn = backend.connect().await.unwrap();
        assert_eq!(conn.get("device:nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_overwrites_and_is_shared_across_connections() {
        let backend = InMemoryBackend::new();
        let mut first = backend.connect().await.unwrap();
        first.set("device:a", "one").await.unwrap();
        first.set("device:a", "two").await.unwrap();

        let mut second = backend.connect().await.unwrap();
        assert_eq!(second.get("device:a").await.unwrap().as_deref(), Some("two"));
        assert_eq!(backend.len(), 1);
    }

    #[tokio::test]
    async fn delete_absent_key_is_noop() {
        let backend = InMemoryBackend::new();
        let mut conn = backend.connect().await.unwrap();
        conn.delete("device:ghost").await.unwrap();
        conn.set("device:x", "v").await.unwrap();
        conn.delete("device:x").await.unwrap();
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn keys_matches_prefix_glob_only() {
        let backend = InMemoryBackend::new();
        let mut conn = backend.connect().await.unwrap();
        conn.set("device:r1", "{}").await.unwrap();
        conn.set("device:sw:2", "{}").await.unwrap();
        conn.set("session:r1", "{}").await.unwrap();
        conn.set("Device:upper", "{}").await.unwrap();

        let mut keys = conn.keys("device:*").await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["device:r1".to_string(), "device:sw:2".to_string()]);
    }

    #[tokio::test]
    async fn keys_rejects_malformed_pattern() {
        let backend = InMemoryBackend::new();
        let mut conn = backend.connect().await.unwrap();
        let err = conn.keys("device:[").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidPattern(_)));
    }

    #[tokio::test]
    async fn dropping_connection_releases_it() {
        let backend = InMemoryBackend::new();
        let first = backend.connect().await.unwrap();
        let second = backend.connect().await.unwrap();
        assert_eq!(backend.open_connections(), 2);
        drop(first);
        assert_eq!(backend.open_connections(), 1);
        drop(second);
        assert_eq!(backend.open_connections(), 0);
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn each_operation_logs_at_debug() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(logs.clone())
            .finish();
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();

        tracing::subscriber::with_default(subscriber, || {
            runtime.block_on(async {
                let backend = InMemoryBackend::new();
                let mut conn = backend.connect().await.unwrap();
                conn.set("device:logged", "{}").await.unwrap();
                conn.get("device:logged").await.unwrap();
                conn.keys("device:*").await.unwrap();
                conn.delete("device:logged").await.unwrap();
            })
        });

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        for op in ["SET", "GET", "KEYS", "DEL"] {
            assert!(output.contains(op), "missing {op} event in:\n{output}");
        }
        assert!(output.contains("device:logged"));
        assert!(output.contains("backend=\"memory\""));
    }
}
