//! Common error types for PinHash components.

use thiserror::Error;

/// Errors surfaced by the puzzle core
#[derive(Debug, Error)]
pub enum PinHashError {
    /// Durable store could not be read or written
    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    /// Guess is not exactly three ASCII digits
    #[error("Invalid guess format: {0}")]
    InvalidGuessFormat(String),

    /// Search exhausted its domain without a match
    #[error("No preimage found in [{min}, {max}]")]
    NotFound { min: u32, max: u32 },

    /// The digest primitive failed or produced malformed output
    #[error("Internal fault: {0}")]
    InternalFault(String),

    /// Digest text is not well-formed hex of the right length
    #[error("Invalid digest: {0}")]
    InvalidDigest(String),

    /// Search domain bounds are inverted
    #[error("Invalid domain: {0}")]
    InvalidDomain(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PinHashError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::PersistenceUnavailable(_) => 503,
            Self::InvalidGuessFormat(_) => 400,
            Self::NotFound { .. } => 404,
            Self::InternalFault(_) => 500,
            Self::InvalidDigest(_) => 400,
            Self::InvalidDomain(_) => 400,
            Self::Config(_) => 500,
        }
    }

    /// Nothing here is retried: every computation is deterministic.
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// Returns true if the feature cannot continue without operator action
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InternalFault(_) | Self::Config(_))
    }
}

/// Errors raised by storage backends
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend refused or failed the operation
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Backend holds data we cannot interpret
    #[error("store corrupt: {0}")]
    Corrupt(String),
}

impl From<StoreError> for PinHashError {
    fn from(err: StoreError) -> Self {
        Self::PersistenceUnavailable(err.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Unavailable(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Corrupt(err.to_string())
    }
}

pub type Result<T, E = PinHashError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_becomes_persistence_unavailable() {
        let err: PinHashError = StoreError::Unavailable("denied".into()).into();
        assert!(matches!(err, PinHashError::PersistenceUnavailable(_)));
        assert_eq!(err.status_code(), 503);
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_nothing_is_retryable() {
        let errors = [
            PinHashError::InvalidGuessFormat("x".into()),
            PinHashError::NotFound { min: 100, max: 999 },
            PinHashError::InternalFault("x".into()),
        ];
        assert!(errors.iter().all(|e| !e.is_retryable()));
        assert!(errors[2].is_fatal());
    }
}
