//! Core types shared across PinHash components.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{DIGEST_HEX_LEN, SECRET_MAX, SECRET_MIN, messages};
use crate::error::PinHashError;

/// Hex-rendered digest (64 lowercase characters for SHA-256).
///
/// Only constructible from well-formed hex, so two `Digest`s compare equal
/// exactly when their rendered strings do.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Digest(String);

impl Digest {
    /// Build a digest from raw hash output
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PinHashError> {
        if bytes.len() * 2 != DIGEST_HEX_LEN {
            return Err(PinHashError::InternalFault(format!(
                "digest is {} bytes, expected {}",
                bytes.len(),
                DIGEST_HEX_LEN / 2
            )));
        }
        Ok(Self(hex::encode(bytes)))
    }

    /// SHA-256 output always has the right width
    pub(crate) fn from_sha256(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Digest {
    type Err = PinHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != DIGEST_HEX_LEN || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(PinHashError::InvalidDigest(format!(
                "expected {} hex characters",
                DIGEST_HEX_LEN
            )));
        }
        Ok(Self(s.to_ascii_lowercase()))
    }
}

impl TryFrom<String> for Digest {
    type Error = PinHashError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Digest> for String {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Closed integer interval searched for preimages and drawn from for secrets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDomain")]
pub struct SearchDomain {
    min: u32,
    max: u32,
}

#[derive(Deserialize)]
struct RawDomain {
    min: u32,
    max: u32,
}

impl TryFrom<RawDomain> for SearchDomain {
    type Error = PinHashError;

    fn try_from(raw: RawDomain) -> Result<Self, Self::Error> {
        Self::new(raw.min, raw.max)
    }
}

impl SearchDomain {
    /// The 3-digit domain every puzzle secret is drawn from
    pub const THREE_DIGIT: SearchDomain = SearchDomain {
        min: SECRET_MIN,
        max: SECRET_MAX,
    };

    pub fn new(min: u32, max: u32) -> Result<Self, PinHashError> {
        if min > max {
            return Err(PinHashError::InvalidDomain(format!(
                "min {} is greater than max {}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Number of candidates in the domain
    pub fn len(&self) -> u64 {
        u64::from(self.max - self.min) + 1
    }

    /// A closed interval always holds at least one value
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Candidates in ascending order
    pub fn iter(&self) -> RangeInclusive<u32> {
        self.min..=self.max
    }
}

impl Default for SearchDomain {
    fn default() -> Self {
        Self::THREE_DIGIT
    }
}

impl fmt::Display for SearchDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Result of checking a guess against the displayed digest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuessOutcome {
    Match,
    NoMatch,
    /// Not exactly three ASCII digits; nothing was hashed
    Invalid,
}

/// Result of a brute-force preimage search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SearchOutcome {
    Found { value: u32, attempts: u64 },
    NotFound { attempts: u64 },
    /// Abandoned before exhausting the domain
    Cancelled { attempts: u64 },
}

impl SearchOutcome {
    pub fn attempts(&self) -> u64 {
        match self {
            Self::Found { attempts, .. }
            | Self::NotFound { attempts }
            | Self::Cancelled { attempts } => *attempts,
        }
    }

    pub fn value(&self) -> Option<u32> {
        match self {
            Self::Found { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Turn `NotFound` into an error for callers that need a value
    pub fn into_result(self, domain: SearchDomain) -> Result<Option<u32>, PinHashError> {
        match self {
            Self::Found { value, .. } => Ok(Some(value)),
            Self::NotFound { .. } => Err(PinHashError::NotFound {
                min: domain.min(),
                max: domain.max(),
            }),
            Self::Cancelled { .. } => Ok(None),
        }
    }
}

/// Visual/semantic state of the status region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Prompt,
    InProgress,
    Success,
    Failure,
}

/// Status region contents handed to a front-end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusView {
    pub kind: StatusKind,
    pub message: String,
}

impl StatusView {
    fn new(kind: StatusKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn prompt() -> Self {
        Self::new(StatusKind::Prompt, messages::ENTER_PIN)
    }

    pub fn in_progress() -> Self {
        Self::new(StatusKind::InProgress, messages::SOLVING)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(StatusKind::Failure, message)
    }

    pub fn for_guess(outcome: GuessOutcome) -> Self {
        match outcome {
            GuessOutcome::Match => Self::new(StatusKind::Success, messages::GUESS_SUCCESS),
            GuessOutcome::NoMatch => Self::new(StatusKind::Failure, messages::GUESS_FAILED),
            // Invalid input re-prompts rather than counting as a miss
            GuessOutcome::Invalid => Self::prompt(),
        }
    }

    pub fn for_search(outcome: SearchOutcome) -> Self {
        match outcome {
            SearchOutcome::Found { value, .. } => {
                Self::new(StatusKind::Success, format!("Solved! Number: {}", value))
            }
            SearchOutcome::NotFound { .. } => Self::new(StatusKind::Failure, messages::NO_SOLUTION),
            SearchOutcome::Cancelled { .. } => Self::prompt_with(messages::SEARCH_CANCELLED),
        }
    }

    fn prompt_with(message: &str) -> Self {
        Self::new(StatusKind::Prompt, message)
    }
}
