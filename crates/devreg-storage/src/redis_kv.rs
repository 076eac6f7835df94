//! Redis implementation of [`KvBackend`].
//!
//! [`RedisBackend`] holds a parsed `redis::Client` but no socket. Every
//! [`KvBackend::connect`] opens a fresh async connection, which is closed
//! when the returned [`KvConnection`] is dropped at the end of the request.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::error::StorageError;
use crate::traits::{KvBackend, KvConnection};

/// Redis-backed key-value backend.
#[derive(Debug, Clone)]
pub struct RedisBackend {
    client: redis::Client,
}

impl RedisBackend {
    /// Parses `url` (`redis://host:port/db`). Does not connect.
    pub fn new(url: &str) -> Result<Self, StorageError> {
        let client =
            redis::Client::open(url).map_err(|e| StorageError::InvalidUrl(e.to_string()))?;
        Ok(RedisBackend { client })
    }
}

#[async_trait]
impl KvBackend for RedisBackend {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn connect(&self) -> Result<Box<dyn KvConnection>, StorageError> {
        let conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(Box::new(RedisConnection { conn }))
    }
}

struct RedisConnection {
    conn: MultiplexedConnection,
}

#[async_trait]
impl KvConnection for RedisConnection {
    async fn get(&mut self, key: &str) -> Result<Option<String>, StorageError> {
        tracing::debug!(backend = "redis", key, "GET");
        Ok(self.conn.get::<_, Option<String>>(key).await?)
    }

    async fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        tracing::debug!(backend = "redis", key, len = value.len(), "SET");
        self.conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        tracing::debug!(backend = "redis", key, "DEL");
        self.conn.del::<_, ()>(key).await?;
        Ok(())
    }

    async fn keys(&mut self, pattern: &str) -> Result<Vec<String>, StorageError> {
        tracing::debug!(backend = "redis", pattern, "KEYS");
        Ok(self.conn.keys::<_, Vec<String>>(pattern).await?)
    }
}
