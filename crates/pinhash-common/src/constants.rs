//! Shared constants for PinHash components.

/// Smallest secret value (inclusive)
pub const SECRET_MIN: u32 = 100;

/// Largest secret value (inclusive)
pub const SECRET_MAX: u32 = 999;

/// Exact number of characters a guess must have
pub const GUESS_LEN: usize = 3;

/// Length of a hex-rendered SHA-256 digest
pub const DIGEST_HEX_LEN: usize = 64;

/// Default Oracle HTTP listen address
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8899";

/// Default Redis connection URL
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Default file store location for the terminal front-end
pub const DEFAULT_STORE_PATH: &str = ".pinhash/state.json";

/// Default key namespace for shared backends
pub const DEFAULT_NAMESPACE: &str = "pinhash";

/// Persisted state keys
pub mod store_keys {
    /// The active puzzle digest
    pub const DIGEST: &str = "sha256";
}

/// User-visible status messages
pub mod messages {
    pub const ENTER_PIN: &str = "Enter a 3-digit number!";
    pub const GUESS_SUCCESS: &str = "Success!";
    pub const GUESS_FAILED: &str = "Failed. Try again!";
    pub const SOLVING: &str = "Solving...";
    pub const NO_SOLUTION: &str = "No solution found (unlikely!)";
    pub const SEARCH_CANCELLED: &str = "Search cancelled";
}
