//! Durable key-value storage for puzzle state.
//!
//! The secret manager only ever touches storage through [`Store`], so the
//! backend can be a JSON file on disk, Redis (see the `oracle` crate), plain
//! memory for tests, or a [`DisabledStore`] when persistence is denied.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::error::StoreError;

/// Key-value store holding the persisted digest
#[async_trait]
pub trait Store: Send + Sync {
    /// Short backend name for logs and status endpoints
    fn backend(&self) -> &'static str;

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove every key this store owns
    async fn clear(&self) -> Result<(), StoreError>;

    /// Cheap reachability probe
    async fn ping(&self) -> Result<(), StoreError> {
        self.get("ping").await.map(|_| ())
    }
}

/// A store that refuses every operation
///
/// Stands in when the durable backend is switched off or could not be reached,
/// which pushes the secret manager into session-only mode.
#[derive(Debug, Clone)]
pub struct DisabledStore {
    reason: String,
}

impl DisabledStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn refuse(&self) -> StoreError {
        StoreError::Unavailable(self.reason.clone())
    }
}

#[async_trait]
impl Store for DisabledStore {
    fn backend(&self) -> &'static str {
        "disabled"
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(self.refuse())
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(self.refuse())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        Err(self.refuse())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_store_refuses_everything() {
        let store = DisabledStore::new("storage denied");
        assert!(matches!(store.get("k").await, Err(StoreError::Unavailable(_))));
        assert!(store.set("k", "v").await.is_err());
        assert!(store.clear().await.is_err());
        assert!(store.ping().await.is_err());
    }
}
