//! Error types for the verification pipeline and credential extraction

use thiserror::Error;

/// Token-related errors
///
/// One variant per pipeline stage failure so callers can tell parse,
/// validate and verify failures apart.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed: {message}")]
    Malformed { message: String },

    #[error("token is expired")]
    Expired,

    #[error("token is not valid yet")]
    NotYetValid,

    #[error("token is missing required claim: {claim}")]
    MissingClaim { claim: String },

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token is unverifiable: unsupported algorithm {algorithm}")]
    UnsupportedAlgorithm { algorithm: String },

    #[error("token is unverifiable: error while loading key: {message}")]
    KeyLoad { message: String },

    #[error("failed to get JWKS from cache: {message}")]
    KeySetUnavailable { message: String },
}

impl TokenError {
    /// Map a `jsonwebtoken` failure onto the pipeline taxonomy
    pub fn from_jwt_error(error: &jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match error.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::ImmatureSignature => TokenError::NotYetValid,
            ErrorKind::MissingRequiredClaim(claim) => TokenError::MissingClaim {
                claim: claim.clone(),
            },
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                TokenError::UnsupportedAlgorithm {
                    algorithm: error.to_string(),
                }
            }
            ErrorKind::InvalidRsaKey(_)
            | ErrorKind::InvalidEcdsaKey
            | ErrorKind::InvalidKeyFormat
            | ErrorKind::RsaFailedSigning => TokenError::KeyLoad {
                message: error.to_string(),
            },
            _ => TokenError::Malformed {
                message: error.to_string(),
            },
        }
    }
}

/// Errors raised while pulling a token or digest out of a request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("missing HTTP header with token")]
    MissingTokenHeader,

    #[error("malformed bearer token format")]
    MalformedBearerFormat,

    #[error("missing HTTP header with hash")]
    MissingHashHeader,
}
