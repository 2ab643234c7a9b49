//! Seam for remotely fetched verification keys

use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;

use crate::errors::DomainError;

/// Source of a remote JSON Web Key Set.
///
/// Implementations own their caching and refresh policy. A failure is
/// reported as `TokenError::KeySetUnavailable`.
#[async_trait]
pub trait KeySetProvider: Send + Sync {
    /// Current key set
    async fn key_set(&self) -> Result<Arc<JwkSet>, DomainError>;
}
