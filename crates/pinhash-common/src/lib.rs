//! # PinHash Common
//!
//! Puzzle core shared by the PinHash front-ends.
//!
//! ## Modules
//! - `types` - Digest, search domain, outcomes and status values
//! - `digest` - Pluggable digest function (SHA-256 by default)
//! - `secret` - Secret generation and digest caching
//! - `search` - Brute-force preimage search
//! - `evaluator` - Guess evaluation
//! - `puzzle` - The three services wired to one digest function and domain
//! - `input` - Live input filtering
//! - `store` - Storage trait and local backends
//! - `error` - Common error types
//! - `constants` - Shared constants

pub mod constants;
pub mod digest;
pub mod error;
pub mod evaluator;
pub mod input;
pub mod puzzle;
pub mod search;
pub mod secret;
pub mod store;
pub mod types;

pub use digest::{DigestFunction, Sha256Digest, digest_of};
pub use error::{PinHashError, StoreError};
pub use evaluator::{GuessEvaluator, evaluate};
pub use input::sanitize_input;
pub use puzzle::Puzzle;
pub use search::{SearchEngine, SearchHandle};
pub use secret::{Obtained, SecretManager};
pub use store::{DisabledStore, FileStore, MemoryStore, Store};
pub use types::*;
