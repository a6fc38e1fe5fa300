//! Digest function over canonical decimal input.
//!
//! Values are canonicalised as their plain decimal string (no sign, no
//! leading zeros) before hashing. The secret manager, the search engine and
//! the guess evaluator all go through [`DigestFunction::digest_value`], so
//! they always agree on the canonical form.

use sha2::{Digest as Sha2Digest, Sha256};

use crate::error::Result;
use crate::types::Digest;

/// A one-way hash rendered as a [`Digest`]
pub trait DigestFunction: Send + Sync {
    /// Algorithm name shown next to the digest
    fn name(&self) -> &'static str;

    /// Hash an arbitrary message
    fn digest(&self, message: &[u8]) -> Result<Digest>;

    /// Hash the canonical decimal form of `value`
    fn digest_value(&self, value: u32) -> Result<Digest> {
        self.digest(canonical_input(value).as_bytes())
    }
}

/// SHA-256, the default puzzle digest
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Digest;

impl DigestFunction for Sha256Digest {
    fn name(&self) -> &'static str {
        "SHA-256"
    }

    fn digest(&self, message: &[u8]) -> Result<Digest> {
        let mut hasher = Sha256::new();
        hasher.update(message);
        Digest::from_bytes(&hasher.finalize())
    }
}

/// Decimal string of `value`; `u32` already excludes a sign
pub fn canonical_input(value: u32) -> String {
    value.to_string()
}

/// SHA-256 digest of `value`'s canonical form
pub fn digest_of(value: u32) -> Digest {
    let hash = Sha256::digest(canonical_input(value).as_bytes());
    Digest::from_sha256(&hash)
}
