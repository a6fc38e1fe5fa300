//! Durable store backends for Oracle.

use std::sync::Arc;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use pinhash_common::{DisabledStore, FileStore, MemoryStore, Store, StoreError};

use crate::config::{StoreBackend, StoreConfig};

/// Redis-backed store; keys live under `{namespace}:`
#[derive(Clone)]
pub struct RedisStore {
    /// Redis connection manager (auto-reconnecting)
    conn: ConnectionManager,
    namespace: String,
}

fn unavailable(err: redis::RedisError) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

impl RedisStore {
    pub async fn connect(redis_url: &str, namespace: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url).map_err(unavailable)?;
        let conn = ConnectionManager::new(client).await.map_err(unavailable)?;

        Ok(Self {
            conn,
            namespace: namespace.to_string(),
        })
    }

    fn key(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }
}

#[async_trait]
impl Store for RedisStore {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        conn.get(self.key(key)).await.map_err(unavailable)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(self.key(key), value)
            .await
            .map_err(unavailable)
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let keys: Vec<String> = conn
            .keys(format!("{}:*", self.namespace))
            .await
            .map_err(unavailable)?;

        if !keys.is_empty() {
            conn.del::<_, ()>(keys).await.map_err(unavailable)?;
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(unavailable)?;
        Ok(())
    }
}

/// Open the configured backend.
///
/// An unreachable backend does not stop the server: it is replaced by a
/// [`DisabledStore`] and puzzles become session-only.
pub async fn open_store(config: &StoreConfig) -> Arc<dyn Store> {
    match config.backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        StoreBackend::File => {
            tracing::info!(path = %config.file_path, "Using file store");
            Arc::new(FileStore::new(&config.file_path))
        }
        StoreBackend::Redis => match RedisStore::connect(&config.redis_url, &config.namespace).await {
            Ok(store) => {
                tracing::info!(url = %config.redis_url, "Redis connected");
                Arc::new(store)
            }
            Err(e) => {
                tracing::warn!(
                    url = %config.redis_url,
                    error = %e,
                    "Redis unavailable, falling back to session-only puzzles"
                );
                Arc::new(DisabledStore::new(e.to_string()))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_backend() {
        let config = StoreConfig {
            backend: StoreBackend::Memory,
            ..Default::default()
        };
        let store = open_store(&config).await;
        assert_eq!(store.backend(), "memory");
    }

    #[tokio::test]
    async fn test_file_backend_uses_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let config = StoreConfig {
            backend: StoreBackend::File,
            file_path: path.to_string_lossy().into_owned(),
            ..Default::default()
        };

        let store = open_store(&config).await;
        store.set("sha256", "abc").await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_unreachable_redis_degrades() {
        let config = StoreConfig {
            backend: StoreBackend::Redis,
            redis_url: "not-a-redis-url".to_string(),
            ..Default::default()
        };
        let store = open_store(&config).await;
        assert_eq!(store.backend(), "disabled");
        assert!(store.ping().await.is_err());
    }
}
