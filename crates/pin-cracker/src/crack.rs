//! Offline digest cracking, sequential or across a rayon pool.

use std::sync::Arc;

use rayon::prelude::*;

use pinhash_common::{
    Digest, DigestFunction, PinHashError, SearchDomain, SearchEngine, SearchHandle,
    SearchOutcome, Sha256Digest,
};

enum Probe {
    Hit(u32),
    Cancelled,
    Fault(PinHashError),
}

/// Crack `target` over `domain`.
///
/// `threads == 1` walks the domain in ascending order on the calling thread.
/// Anything else fans out over a rayon pool (`0` = one thread per core) and
/// still reports the lowest matching value. The handle's attempt counter is
/// the number of digests computed, which in parallel mode can run past the
/// matching position.
pub fn crack(
    target: &Digest,
    domain: SearchDomain,
    threads: usize,
    handle: &SearchHandle,
) -> Result<SearchOutcome, PinHashError> {
    if threads == 1 {
        let engine = SearchEngine::new(Arc::new(Sha256Digest), domain);
        return engine.search_blocking(target, handle);
    }

    let threads = if threads == 0 { num_cpus() } else { threads };
    tracing::debug!(threads, domain = %domain, "Parallel crack");
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| PinHashError::InternalFault(format!("thread pool: {}", e)))?;

    let probe = pool.install(|| {
        domain.iter().into_par_iter().find_map_first(|candidate| {
            if handle.is_cancelled() {
                return Some(Probe::Cancelled);
            }
            handle.record_attempt();
            match Sha256Digest.digest_value(candidate) {
                Ok(digest) if &digest == target => Some(Probe::Hit(candidate)),
                Ok(_) => None,
                Err(e) => Some(Probe::Fault(e)),
            }
        })
    });

    let attempts = handle.attempts();
    match probe {
        Some(Probe::Hit(value)) => Ok(SearchOutcome::Found { value, attempts }),
        Some(Probe::Cancelled) => Ok(SearchOutcome::Cancelled { attempts }),
        Some(Probe::Fault(e)) => Err(e),
        None => Ok(SearchOutcome::NotFound { attempts }),
    }
}

pub fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(4)
}
