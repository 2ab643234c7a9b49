//! Token fingerprints used as blocklist cache keys.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::DomainError;

static SHA256_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Fa-f0-9]{64}$").expect("valid sha256 pattern"));

/// Hex-encoded SHA256 digest of a string.
pub fn sha256_from_string(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hex::encode(hasher.finalize())
}

/// Check that a caller-supplied value has the shape of a SHA256 hex digest.
pub fn validate_sha256(value: &str) -> Result<(), DomainError> {
    if SHA256_PATTERN.is_match(value) {
        Ok(())
    } else {
        Err(DomainError::MalformedDigest)
    }
}

/// A validated, lowercase SHA256 digest of a token.
///
/// This is the only value ever used as a blocklist key, so arbitrary
/// caller input can never reach the cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenDigest(String);

impl TokenDigest {
    /// Fingerprint a raw token
    pub fn of_token(token: &str) -> Self {
        Self(sha256_from_string(token))
    }

    /// Accept an externally supplied digest after validating its format.
    ///
    /// Uppercase hex is accepted and normalized.
    pub fn parse(candidate: &str) -> Result<Self, DomainError> {
        validate_sha256(candidate)?;
        Ok(Self(candidate.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TokenDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TokenDigest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
