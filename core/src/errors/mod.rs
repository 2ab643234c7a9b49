//! Domain-specific error types and error handling.

mod types;


pub use types::{CredentialError, TokenError};

use jb_shared::errors::{ErrorResponse, IntoErrorResponse};
use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("malformed sha256")]
    MalformedDigest,

    #[error("no key set for JWT verification")]
    NoVerificationKeyConfigured,

    /// The blocklist cache could not be reached or answered with an error.
    ///
    /// Never interpreted as "not blocked".
    #[error("server cache configuration error")]
    CacheUnavailable { message: String },

    #[error("invalid Lambda event type")]
    UnrecognizedEventType,

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Credential(#[from] CredentialError),
}

impl DomainError {
    /// Whether the failure came from the blocklist cache rather than the caller's input
    pub fn is_cache_unavailable(&self) -> bool {
        matches!(self, DomainError::CacheUnavailable { .. })
    }
}

impl IntoErrorResponse for DomainError {
    fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.to_string())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
