//! # Infrastructure Layer
//!
//! Concrete collaborators for the jwtblock core:
//! - **Cache**: Redis client and the Redis-backed `BlocklistStore`
//! - **JWKS**: remote key set fetcher implementing `KeySetProvider`

/// Cache module - Redis client and blocklist store
pub mod cache;

/// Remote JSON Web Key Set client
pub mod jwks;

use jb_core::errors::{DomainError, TokenError};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// A cache command did not answer in time
    #[error("Cache timeout: {operation}")]
    Timeout { operation: String },

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// An external service answered with an unusable payload
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Cache(_) | InfrastructureError::Timeout { .. } => {
                DomainError::CacheUnavailable {
                    message: err.to_string(),
                }
            }
            InfrastructureError::Http(_) | InfrastructureError::InvalidResponse(_) => {
                DomainError::Token(TokenError::KeySetUnavailable {
                    message: err.to_string(),
                })
            }
            InfrastructureError::Config(message) => DomainError::Internal { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_errors_map_to_cache_unavailable() {
        let io = redis::RedisError::from(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "Connection refused",
        ));
        let err: DomainError = InfrastructureError::Cache(io).into();
        assert!(err.is_cache_unavailable());

        let err: DomainError = InfrastructureError::Timeout {
            operation: "TTL".to_string(),
        }
        .into();
        assert!(err.is_cache_unavailable());
        assert_eq!(err.to_string(), "server cache configuration error");
    }

    #[test]
    fn test_config_error_maps_to_internal() {
        let err: DomainError = InfrastructureError::Config("bad url".to_string()).into();
        assert!(matches!(err, DomainError::Internal { .. }));
    }
}
