//! Application state and shared resources.

use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::sync::Mutex;

use pinhash_common::{Puzzle, SearchHandle, Sha256Digest, Store};

use crate::backend;
use crate::config::AppConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Secret manager, search engine and evaluator
    pub puzzle: Arc<Puzzle>,

    /// Handles of solves still running
    pub searches: Arc<Mutex<Vec<SearchHandle>>>,

    /// Request counters
    pub stats: Arc<OracleStats>,

    pub started_at: Instant,
}

/// Runtime statistics
#[derive(Default)]
pub struct OracleStats {
    pub puzzles_served: AtomicU64,
    pub guesses: AtomicU64,
    pub guesses_matched: AtomicU64,
    pub guesses_invalid: AtomicU64,
    pub searches_run: AtomicU64,
    pub searches_cancelled: AtomicU64,
    pub resets: AtomicU64,
}

/// Point-in-time copy of [`OracleStats`]
#[derive(Debug, Clone, Serialize)]
pub struct OracleStatsSnapshot {
    pub puzzles_served: u64,
    pub guesses: u64,
    pub guesses_matched: u64,
    pub guesses_invalid: u64,
    pub searches_run: u64,
    pub searches_cancelled: u64,
    pub resets: u64,
}

impl OracleStats {
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> OracleStatsSnapshot {
        OracleStatsSnapshot {
            puzzles_served: self.puzzles_served.load(Ordering::Relaxed),
            guesses: self.guesses.load(Ordering::Relaxed),
            guesses_matched: self.guesses_matched.load(Ordering::Relaxed),
            guesses_invalid: self.guesses_invalid.load(Ordering::Relaxed),
            searches_run: self.searches_run.load(Ordering::Relaxed),
            searches_cancelled: self.searches_cancelled.load(Ordering::Relaxed),
            resets: self.resets.load(Ordering::Relaxed),
        }
    }
}

impl AppState {
    /// Create new application state, opening the configured store
    pub async fn new(config: AppConfig) -> Result<Self> {
        let store = backend::open_store(&config.store).await;
        Self::with_store(config, store)
    }

    /// Create application state around an existing store
    pub fn with_store(config: AppConfig, store: Arc<dyn Store>) -> Result<Self> {
        let domain = config.domain.to_domain()?;
        let puzzle = Arc::new(Puzzle::new(store, Arc::new(Sha256Digest), domain));

        Ok(Self {
            config,
            puzzle,
            searches: Arc::new(Mutex::new(Vec::new())),
            stats: Arc::new(OracleStats::default()),
            started_at: Instant::now(),
        })
    }

    /// Track a solve so a reset can cancel it
    pub async fn register_search(&self) -> SearchHandle {
        let handle = SearchHandle::new();
        self.searches.lock().await.push(handle.clone());
        handle
    }

    pub async fn finish_search(&self, handle: &SearchHandle) {
        self.searches
            .lock()
            .await
            .retain(|other| !other.same_search(handle));
    }

    /// Cancel every running solve, returning how many were stopped
    pub async fn cancel_searches(&self) -> usize {
        let mut searches = self.searches.lock().await;
        for handle in searches.iter() {
            handle.cancel();
        }
        let cancelled = searches.len();
        searches.clear();
        cancelled
    }
}
