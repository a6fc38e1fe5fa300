//! Brute-force preimage search.
//!
//! Candidates are digested strictly one after another in ascending order and
//! the task yields to the runtime between candidates, so a search never hogs
//! an executor thread and can be abandoned at any candidate boundary. The
//! search never writes persisted state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::digest::DigestFunction;
use crate::error::Result;
use crate::types::{Digest, SearchDomain, SearchOutcome};

/// Shared cancellation flag and attempt counter for one search
#[derive(Debug, Clone, Default)]
pub struct SearchHandle {
    cancelled: Arc<AtomicBool>,
    attempts: Arc<AtomicU64>,
}

impl SearchHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the search to stop before its next candidate
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Candidates digested so far
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    /// True when both handles control the same search
    pub fn same_search(&self, other: &SearchHandle) -> bool {
        Arc::ptr_eq(&self.cancelled, &other.cancelled)
    }

    /// Count one digested candidate; for search drivers outside this module
    pub fn record_attempt(&self) -> u64 {
        self.attempts.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Preimage search engine
pub struct SearchEngine {
    hasher: Arc<dyn DigestFunction>,
    domain: SearchDomain,
}

impl SearchEngine {
    pub fn new(hasher: Arc<dyn DigestFunction>, domain: SearchDomain) -> Self {
        Self { hasher, domain }
    }

    pub fn domain(&self) -> SearchDomain {
        self.domain
    }

    /// Search the whole domain for `target`
    pub async fn brute_force_search(&self, target: &Digest) -> Result<SearchOutcome> {
        self.search_with(target, &SearchHandle::new()).await
    }

    /// Search with an externally owned handle for progress and cancellation.
    ///
    /// `NotFound` is an ordinary outcome; only a failing digest function
    /// produces an error.
    pub async fn search_with(&self, target: &Digest, handle: &SearchHandle) -> Result<SearchOutcome> {
        tracing::debug!(domain = %self.domain, digest = %target, "Starting preimage search");

        let mut attempts = 0;
        for candidate in self.domain.iter() {
            if handle.is_cancelled() {
                tracing::debug!(attempts, "Preimage search cancelled");
                return Ok(SearchOutcome::Cancelled { attempts });
            }

            let digest = self.hasher.digest_value(candidate)?;
            attempts = handle.record_attempt();

            if &digest == target {
                tracing::info!(value = candidate, attempts, "Preimage found");
                return Ok(SearchOutcome::Found {
                    value: candidate,
                    attempts,
                });
            }

            tokio::task::yield_now().await;
        }

        tracing::info!(domain = %self.domain, attempts, "Preimage search exhausted domain");
        Ok(SearchOutcome::NotFound { attempts })
    }

    /// Blocking variant for callers outside an async runtime
    pub fn search_blocking(&self, target: &Digest, handle: &SearchHandle) -> Result<SearchOutcome> {
        let mut attempts = 0;
        for candidate in self.domain.iter() {
            if handle.is_cancelled() {
                return Ok(SearchOutcome::Cancelled { attempts });
            }
            let digest = self.hasher.digest_value(candidate)?;
            attempts = handle.record_attempt();
            if &digest == target {
                return Ok(SearchOutcome::Found {
                    value: candidate,
                    attempts,
                });
            }
        }
        Ok(SearchOutcome::NotFound { attempts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::{Sha256Digest, digest_of};
    use crate::error::PinHashError;

    fn engine() -> SearchEngine {
        SearchEngine::new(Arc::new(Sha256Digest), SearchDomain::default())
    }

    /// Digest function whose primitive is missing
    struct BrokenDigest;

    impl DigestFunction for BrokenDigest {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn digest(&self, _message: &[u8]) -> Result<Digest> {
            Err(PinHashError::InternalFault("hash primitive unavailable".into()))
        }
    }

    #[tokio::test]
    async fn test_finds_137() {
        let outcome = engine().brute_force_search(&digest_of(137)).await.unwrap();
        assert_eq!(
            outcome,
            SearchOutcome::Found {
                value: 137,
                attempts: 38
            }
        );
    }

    #[tokio::test]
    async fn test_domain_edges() {
        let engine = engine();
        let low = engine.brute_force_search(&digest_of(100)).await.unwrap();
        assert_eq!(low.value(), Some(100));
        assert_eq!(low.attempts(), 1);

        let high = engine.brute_force_search(&digest_of(999)).await.unwrap();
        assert_eq!(high.value(), Some(999));
        assert_eq!(high.attempts(), 900);
    }

    #[tokio::test]
    async fn test_out_of_domain_target_is_not_found() {
        let outcome = engine().brute_force_search(&digest_of(50)).await.unwrap();
        assert_eq!(outcome, SearchOutcome::NotFound { attempts: 900 });
    }

    #[tokio::test]
    async fn test_broken_digest_is_fault_not_not_found() {
        let engine = SearchEngine::new(Arc::new(BrokenDigest), SearchDomain::default());
        let err = engine.brute_force_search(&digest_of(137)).await.unwrap_err();
        assert!(matches!(err, PinHashError::InternalFault(_)));
    }

    #[tokio::test]
    async fn test_failed_digest_is_not_counted() {
        let engine = SearchEngine::new(Arc::new(BrokenDigest), SearchDomain::default());

        let blocking = SearchHandle::new();
        assert!(engine.search_blocking(&digest_of(137), &blocking).is_err());
        assert_eq!(blocking.attempts(), 0);

        let cooperative = SearchHandle::new();
        assert!(engine.search_with(&digest_of(137), &cooperative).await.is_err());
        assert_eq!(cooperative.attempts(), 0);
    }

    #[tokio::test]
    async fn test_cancel_before_start() {
        let handle = SearchHandle::new();
        handle.cancel();
        let outcome = engine().search_with(&digest_of(999), &handle).await.unwrap();
        assert_eq!(outcome, SearchOutcome::Cancelled { attempts: 0 });
    }

    #[tokio::test]
    async fn test_cancel_mid_search_from_another_task() {
        let engine = Arc::new(engine());
        let handle = SearchHandle::new();

        let search = {
            let engine = engine.clone();
            let handle = handle.clone();
            tokio::spawn(async move { engine.search_with(&digest_of(50), &handle).await })
        };

        while handle.attempts() == 0 {
            tokio::task::yield_now().await;
        }
        handle.cancel();

        let outcome = search.await.unwrap().unwrap();
        match outcome {
            SearchOutcome::Cancelled { attempts } => assert!(attempts < 900),
            // The search may legitimately finish before the flag is seen
            SearchOutcome::NotFound { attempts } => assert_eq!(attempts, 900),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_handle_counts_attempts() {
        let handle = SearchHandle::new();
        engine().search_with(&digest_of(110), &handle).await.unwrap();
        assert_eq!(handle.attempts(), 11);
    }

    #[test]
    fn test_blocking_variant_matches_async() {
        let engine = engine();
        let outcome = engine
            .search_blocking(&digest_of(512), &SearchHandle::new())
            .unwrap();
        let expected = tokio_test::block_on(engine.brute_force_search(&digest_of(512))).unwrap();
        assert_eq!(outcome, expected);
    }

    #[test]
    fn test_custom_domain() {
        let engine = SearchEngine::new(Arc::new(Sha256Digest), SearchDomain::new(0, 99).unwrap());
        let outcome = engine
            .search_blocking(&digest_of(50), &SearchHandle::new())
            .unwrap();
        assert_eq!(outcome.value(), Some(50));
    }
}
