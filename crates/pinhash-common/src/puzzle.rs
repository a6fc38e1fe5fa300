//! One puzzle: secret manager, search engine and evaluator wired to the same
//! digest function and domain.
//!
//! Building all three from a single domain keeps generation and search in
//! step; a search that reports `NotFound` then really means no value in the
//! domain hashes to the target.

use std::sync::Arc;

use crate::digest::{DigestFunction, Sha256Digest};
use crate::evaluator::GuessEvaluator;
use crate::search::SearchEngine;
use crate::secret::SecretManager;
use crate::store::Store;
use crate::types::SearchDomain;

pub struct Puzzle {
    pub secrets: SecretManager,
    pub engine: SearchEngine,
    pub evaluator: GuessEvaluator,
}

impl Puzzle {
    pub fn new(store: Arc<dyn Store>, hasher: Arc<dyn DigestFunction>, domain: SearchDomain) -> Self {
        Self {
            secrets: SecretManager::new(store, hasher.clone(), domain),
            engine: SearchEngine::new(hasher.clone(), domain),
            evaluator: GuessEvaluator::new(hasher),
        }
    }

    /// SHA-256 over the 3-digit domain
    pub fn sha256(store: Arc<dyn Store>) -> Self {
        Self::new(store, Arc::new(Sha256Digest), SearchDomain::default())
    }

    pub fn domain(&self) -> SearchDomain {
        self.engine.domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::{GuessOutcome, SearchOutcome};

    #[tokio::test]
    async fn test_search_recovers_generated_secret() {
        let puzzle = Puzzle::sha256(Arc::new(MemoryStore::new()));
        let digest = puzzle.secrets.obtain_digest().await.unwrap();

        let outcome = puzzle.engine.brute_force_search(&digest).await.unwrap();
        let value = match outcome {
            SearchOutcome::Found { value, .. } => value,
            other => panic!("expected a preimage, got {:?}", other),
        };
        assert!(puzzle.domain().contains(value));

        let guess = value.to_string();
        assert_eq!(
            puzzle.evaluator.evaluate(&guess, &digest).unwrap(),
            GuessOutcome::Match
        );
    }

    #[tokio::test]
    async fn test_narrow_domain_is_shared() {
        let domain = SearchDomain::new(400, 402).unwrap();
        let puzzle = Puzzle::new(Arc::new(MemoryStore::new()), Arc::new(Sha256Digest), domain);
        let digest = puzzle.secrets.obtain_digest().await.unwrap();

        let outcome = puzzle.engine.brute_force_search(&digest).await.unwrap();
        assert!(outcome.attempts() <= 3);
        assert!(domain.contains(outcome.value().unwrap()));
    }
}
