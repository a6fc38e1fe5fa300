//! Secret generation and digest caching.
//!
//! Only the digest is ever written to the store. Once a digest is stored it is
//! returned unchanged until [`SecretManager::reset`] clears it, so the puzzle
//! is stable across restarts.

use std::sync::Arc;

use rand::Rng;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::constants::store_keys;
use crate::digest::DigestFunction;
use crate::error::{PinHashError, Result, StoreError};
use crate::store::Store;
use crate::types::{Digest, SearchDomain};

/// Digest handed to a front-end, plus whether it survives a restart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Obtained {
    pub digest: Digest,
    pub persistent: bool,
}

/// Secret manager service
pub struct SecretManager {
    store: Arc<dyn Store>,
    hasher: Arc<dyn DigestFunction>,
    domain: SearchDomain,
    /// Session-only digest used while the store is unavailable. The lock
    /// also serialises every read-then-write of the stored slot.
    session: Mutex<Option<Digest>>,
}

impl SecretManager {
    pub fn new(
        store: Arc<dyn Store>,
        hasher: Arc<dyn DigestFunction>,
        domain: SearchDomain,
    ) -> Self {
        Self {
            store,
            hasher,
            domain,
            session: Mutex::new(None),
        }
    }

    pub fn domain(&self) -> SearchDomain {
        self.domain
    }

    pub fn algorithm(&self) -> &'static str {
        self.hasher.name()
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Probe the durable store without touching the puzzle
    pub async fn ping_store(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }

    /// Return the stored digest, or draw a new secret and persist its digest
    pub async fn obtain_digest(&self) -> Result<Digest> {
        let _slot = self.session.lock().await;
        self.load_or_generate().await
    }

    /// Like [`obtain_digest`](Self::obtain_digest), but falls back to a
    /// session-only digest when the store is unavailable.
    ///
    /// Once a session digest exists it is kept until [`reset`](Self::reset),
    /// even if the store comes back.
    pub async fn obtain_or_degrade(&self) -> Result<Obtained> {
        let mut session = self.session.lock().await;
        if let Some(digest) = session.as_ref() {
            return Ok(Obtained {
                digest: digest.clone(),
                persistent: false,
            });
        }

        match self.load_or_generate().await {
            Ok(digest) => Ok(Obtained {
                digest,
                persistent: true,
            }),
            Err(PinHashError::PersistenceUnavailable(reason)) => {
                tracing::warn!(
                    backend = self.store.backend(),
                    reason = %reason,
                    "Persistence unavailable, puzzle will not survive a restart"
                );
                let digest = self.fresh_digest()?;
                *session = Some(digest.clone());
                Ok(Obtained {
                    digest,
                    persistent: false,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Forget the current puzzle so the next obtain draws a new secret
    pub async fn reset(&self) -> Result<()> {
        let mut session = self.session.lock().await;
        session.take();
        self.store.clear().await?;

        tracing::info!(backend = self.store.backend(), "Puzzle reset");
        Ok(())
    }

    /// Read-then-write of the digest slot; callers hold the `session` lock
    async fn load_or_generate(&self) -> Result<Digest> {
        if let Some(stored) = self.store.get(store_keys::DIGEST).await? {
            return stored.parse().map_err(|_| {
                PinHashError::PersistenceUnavailable(format!(
                    "stored value under '{}' is not a digest",
                    store_keys::DIGEST
                ))
            });
        }

        let digest = self.fresh_digest()?;
        self.store.set(store_keys::DIGEST, digest.as_str()).await?;

        tracing::info!(
            backend = self.store.backend(),
            domain = %self.domain,
            "Generated new puzzle"
        );

        Ok(digest)
    }

    /// Draw a secret uniformly from the domain and digest it.
    /// The secret itself goes out of scope here.
    fn fresh_digest(&self) -> Result<Digest> {
        let secret = rand::rng().random_range(self.domain.iter());
        self.hasher.digest_value(secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;

    use crate::digest::{Sha256Digest, digest_of};
    use crate::store::{DisabledStore, MemoryStore};

    /// Memory store that can be switched off and on again
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        down: AtomicBool,
    }

    impl FlakyStore {
        fn set_down(&self, down: bool) {
            self.down.store(down, Ordering::SeqCst);
        }

        fn check(&self) -> Result<(), StoreError> {
            if self.down.load(Ordering::SeqCst) {
                Err(StoreError::Unavailable("connection refused".into()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl Store for FlakyStore {
        fn backend(&self) -> &'static str {
            "flaky"
        }

        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.check()?;
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            self.check()?;
            self.inner.set(key, value).await
        }

        async fn clear(&self) -> Result<(), StoreError> {
            self.check()?;
            self.inner.clear().await
        }
    }

    fn manager(store: Arc<dyn Store>) -> SecretManager {
        SecretManager::new(store, Arc::new(Sha256Digest), SearchDomain::default())
    }

    fn domain_digests() -> Vec<Digest> {
        SearchDomain::default().iter().map(digest_of).collect()
    }

    #[tokio::test]
    async fn test_obtain_is_idempotent_with_one_write() {
        let store = Arc::new(MemoryStore::new());
        let secrets = manager(store.clone());

        let first = secrets.obtain_digest().await.unwrap();
        let second = secrets.obtain_digest().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.writes(), 1);
    }

    #[tokio::test]
    async fn test_only_digest_is_persisted() {
        let store = Arc::new(MemoryStore::new());
        let digest = manager(store.clone()).obtain_digest().await.unwrap();

        let stored = store.get(store_keys::DIGEST).await.unwrap().unwrap();
        assert_eq!(stored, digest.as_str());
        assert!(domain_digests().contains(&digest));
    }

    #[tokio::test]
    async fn test_stored_digest_survives_new_manager() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let first = manager(store.clone()).obtain_digest().await.unwrap();
        let again = manager(store).obtain_digest().await.unwrap();
        assert_eq!(first, again);
    }

    #[tokio::test]
    async fn test_existing_digest_is_never_overwritten() {
        let store = Arc::new(MemoryStore::new());
        let planted = digest_of(137);
        store.set(store_keys::DIGEST, planted.as_str()).await.unwrap();

        let secrets = manager(store.clone());
        assert_eq!(secrets.obtain_digest().await.unwrap(), planted);
        assert_eq!(store.writes(), 1);
    }

    #[tokio::test]
    async fn test_reset_redraws_secret() {
        let store = Arc::new(MemoryStore::new());
        let secrets = manager(store.clone());

        secrets.obtain_digest().await.unwrap();
        secrets.reset().await.unwrap();
        assert_eq!(store.get(store_keys::DIGEST).await.unwrap(), None);

        let after = secrets.obtain_digest().await.unwrap();
        assert!(domain_digests().contains(&after));
        assert_eq!(store.writes(), 2);
    }

    #[tokio::test]
    async fn test_resets_eventually_vary() {
        let store = Arc::new(MemoryStore::new());
        let secrets = manager(store);

        let mut seen = std::collections::HashSet::new();
        for _ in 0..20 {
            seen.insert(secrets.obtain_digest().await.unwrap());
            secrets.reset().await.unwrap();
        }
        // 20 identical draws out of 900 values would be astronomically unlikely
        assert!(seen.len() > 1);
    }

    #[tokio::test]
    async fn test_unavailable_store_reports_persistence_error() {
        let secrets = manager(Arc::new(DisabledStore::new("denied")));
        let err = secrets.obtain_digest().await.unwrap_err();
        assert!(matches!(err, PinHashError::PersistenceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_degraded_mode_is_stable_within_session() {
        let secrets = manager(Arc::new(DisabledStore::new("denied")));

        let first = secrets.obtain_or_degrade().await.unwrap();
        let second = secrets.obtain_or_degrade().await.unwrap();

        assert!(!first.persistent);
        assert_eq!(first, second);
        assert!(domain_digests().contains(&first.digest));
    }

    #[tokio::test]
    async fn test_corrupt_stored_value_degrades() {
        let store = Arc::new(MemoryStore::new());
        store.set(store_keys::DIGEST, "garbage").await.unwrap();

        let secrets = manager(store.clone());
        assert!(matches!(
            secrets.obtain_digest().await,
            Err(PinHashError::PersistenceUnavailable(_))
        ));

        let obtained = secrets.obtain_or_degrade().await.unwrap();
        assert!(!obtained.persistent);
        // Corrupt slot is left for the operator to clear
        assert_eq!(
            store.get(store_keys::DIGEST).await.unwrap().as_deref(),
            Some("garbage")
        );
    }

    #[tokio::test]
    async fn test_reset_on_disabled_store_still_clears_session() {
        let secrets = manager(Arc::new(DisabledStore::new("denied")));
        secrets.obtain_or_degrade().await.unwrap();

        assert!(secrets.reset().await.is_err());
        assert!(secrets.session.lock().await.is_none());
    }

    #[tokio::test]
    async fn test_persistent_obtain_is_flagged() {
        let secrets = manager(Arc::new(MemoryStore::new()));
        let obtained = secrets.obtain_or_degrade().await.unwrap();
        assert!(obtained.persistent);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_obtains_share_one_digest() {
        for _ in 0..20 {
            let store = Arc::new(MemoryStore::new());
            let secrets = Arc::new(manager(store.clone()));

            let tasks: Vec<_> = (0..8)
                .map(|_| {
                    let secrets = secrets.clone();
                    tokio::spawn(async move { secrets.obtain_digest().await })
                })
                .collect();

            let mut digests = Vec::new();
            for task in tasks {
                digests.push(task.await.unwrap().unwrap());
            }

            assert!(digests.iter().all(|d| d == &digests[0]));
            assert_eq!(store.writes(), 1);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_obtains_on_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn Store> =
            Arc::new(crate::store::FileStore::new(dir.path().join("state.json")));
        let secrets = Arc::new(manager(store));

        let a = tokio::spawn({
            let secrets = secrets.clone();
            async move { secrets.obtain_or_degrade().await }
        });
        let b = tokio::spawn({
            let secrets = secrets.clone();
            async move { secrets.obtain_or_degrade().await }
        });
        let (a, b) = tokio::join!(a, b);

        assert_eq!(a.unwrap().unwrap(), b.unwrap().unwrap());
    }

    #[tokio::test]
    async fn test_session_digest_survives_store_recovery() {
        let store = Arc::new(FlakyStore::default());
        let secrets = manager(store.clone());

        store.set_down(true);
        let degraded = secrets.obtain_or_degrade().await.unwrap();
        assert!(!degraded.persistent);

        store.set_down(false);
        let again = secrets.obtain_or_degrade().await.unwrap();
        assert_eq!(again, degraded);
        assert_eq!(store.inner.writes(), 0);

        secrets.reset().await.unwrap();
        let fresh = secrets.obtain_or_degrade().await.unwrap();
        assert!(fresh.persistent);
        assert_eq!(store.inner.writes(), 1);
    }
}
