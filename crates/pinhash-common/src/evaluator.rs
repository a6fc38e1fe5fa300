//! Guess evaluation.

use std::sync::Arc;

use crate::constants::GUESS_LEN;
use crate::digest::{DigestFunction, Sha256Digest};
use crate::error::{PinHashError, Result};
use crate::types::{Digest, GuessOutcome};

/// True when `guess` is exactly three ASCII digits
pub fn is_well_formed(guess: &str) -> bool {
    guess.len() == GUESS_LEN && guess.bytes().all(|b| b.is_ascii_digit())
}

/// Checks guesses against the displayed digest
pub struct GuessEvaluator {
    hasher: Arc<dyn DigestFunction>,
}

impl Default for GuessEvaluator {
    fn default() -> Self {
        Self::new(Arc::new(Sha256Digest))
    }
}

impl GuessEvaluator {
    pub fn new(hasher: Arc<dyn DigestFunction>) -> Self {
        Self { hasher }
    }

    /// Format is checked before any hashing; malformed input costs nothing.
    pub fn evaluate(&self, guess: &str, target: &Digest) -> Result<GuessOutcome> {
        let value = match parse_guess(guess) {
            Ok(value) => value,
            Err(_) => return Ok(GuessOutcome::Invalid),
        };

        let digest = self.hasher.digest_value(value)?;
        let outcome = if &digest == target {
            GuessOutcome::Match
        } else {
            GuessOutcome::NoMatch
        };

        tracing::debug!(outcome = ?outcome, "Guess evaluated");
        Ok(outcome)
    }
}

/// Parse a well-formed guess into its integer value
pub fn parse_guess(guess: &str) -> Result<u32> {
    if !is_well_formed(guess) {
        return Err(PinHashError::InvalidGuessFormat(format!(
            "expected exactly {} digits",
            GUESS_LEN
        )));
    }
    guess
        .parse()
        .map_err(|e| PinHashError::InvalidGuessFormat(format!("{}", e)))
}

/// Evaluate with the default SHA-256 digest
pub fn evaluate(guess: &str, target: &Digest) -> Result<GuessOutcome> {
    GuessEvaluator::default().evaluate(guess, target)
}
