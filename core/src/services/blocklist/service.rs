//! Blocklist operations: block, check, unblock, flush, list and size.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::value_objects::{
    BlockResult, CheckResult, FlushResult, ListResult, StatusResult, TokenDigest, UnblockResult,
};
use crate::errors::DomainError;
use crate::repositories::blocklist::{BlocklistStore, EntryTtl, KeyTtl};
use crate::services::ttl::TtlPolicy;
use crate::services::verification::TokenVerifier;

/// Blocklist service shared by every front end
///
/// Holds no state of its own: the store is the single source of truth and
/// its clock governs expiry.
pub struct BlocklistService<S: BlocklistStore> {
    store: Arc<S>,
    verifier: Arc<TokenVerifier>,
    ttl_policy: TtlPolicy,
}

impl<S: BlocklistStore> Clone for BlocklistService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            verifier: Arc::clone(&self.verifier),
            ttl_policy: self.ttl_policy,
        }
    }
}

impl<S: BlocklistStore> BlocklistService<S> {
    /// Creates a new blocklist service
    ///
    /// # Arguments
    ///
    /// * `store` - Expiring key-value store holding block records
    /// * `verifier` - Pipeline run before any token-based operation
    /// * `ttl_policy` - Lifetime policy for new records
    pub fn new(store: Arc<S>, verifier: Arc<TokenVerifier>, ttl_policy: TtlPolicy) -> Self {
        Self {
            store,
            verifier,
            ttl_policy,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    /// Blocks a token until its resolved TTL elapses
    ///
    /// # Arguments
    ///
    /// * `token` - Raw token
    /// * `explicit_ttl` - TTL in seconds; negative means "not specified", `0` never expires
    ///
    /// # Returns
    ///
    /// * `Ok(BlockResult)` - `is_new` is false when the token was already blocked;
    ///   the existing record keeps its TTL
    /// * `Err(DomainError)` - Verification failed or the cache is unavailable
    pub async fn block(&self, token: &str, explicit_ttl: i64) -> Result<BlockResult, DomainError> {
        let claims = self.verifier.run_checks(token).await?;
        let digest = TokenDigest::of_token(token);
        let ttl = self.ttl_policy.resolve(explicit_ttl, &claims);

        let is_new = self
            .store
            .insert_if_absent(&digest, EntryTtl::from_seconds(ttl.seconds()))
            .await?;

        debug!(sha256 = %digest, is_new, ttl = ttl.seconds(), "Token block processed");
        Ok(BlockResult::new(is_new, &ttl))
    }

    /// Checks a caller-supplied digest; malformed digests never reach the store
    pub async fn check_by_sha256(&self, sha256: &str) -> Result<CheckResult, DomainError> {
        let digest = TokenDigest::parse(sha256)?;
        self.check_digest(&digest).await
    }

    /// Verifies a token, then checks its digest
    pub async fn check_by_jwt(&self, token: &str) -> Result<CheckResult, DomainError> {
        self.verifier.run_checks(token).await?;
        self.check_digest(&TokenDigest::of_token(token)).await
    }

    async fn check_digest(&self, digest: &TokenDigest) -> Result<CheckResult, DomainError> {
        let result = match self.store.remaining_ttl(digest).await? {
            KeyTtl::Missing => CheckResult::allowed(),
            KeyTtl::Persistent => CheckResult::blocked(0),
            // Redis reports 0 under half a second from expiry; 0 is the infinite sentinel
            KeyTtl::Expiring(seconds) => CheckResult::blocked(seconds.max(1)),
        };
        debug!(sha256 = %digest, blocked = result.blocked, "Blocklist lookup");
        Ok(result)
    }

    /// Removes a caller-supplied digest from the blocklist
    pub async fn unblock_by_sha256(&self, sha256: &str) -> Result<UnblockResult, DomainError> {
        let digest = TokenDigest::parse(sha256)?;
        self.unblock_digest(&digest).await
    }

    /// Verifies a token, then removes its digest from the blocklist
    pub async fn unblock_by_jwt(&self, token: &str) -> Result<UnblockResult, DomainError> {
        self.verifier.run_checks(token).await?;
        self.unblock_digest(&TokenDigest::of_token(token)).await
    }

    async fn unblock_digest(&self, digest: &TokenDigest) -> Result<UnblockResult, DomainError> {
        let was_present = self.store.delete(digest).await?;
        debug!(sha256 = %digest, was_present, "Token unblock processed");
        Ok(UnblockResult::new(was_present))
    }

    /// Clears the blocklist, reporting how many records it held.
    ///
    /// Size and clear are two store calls; a block landing between them is
    /// cleared without being counted.
    pub async fn flush(&self) -> Result<FlushResult, DomainError> {
        let count = self.store.size().await?;
        self.store.clear().await?;
        info!(count, "Flushed the blocklist");
        Ok(FlushResult::new(count))
    }

    /// Every digest in the blocklist. Scans the whole namespace.
    pub async fn list(&self) -> Result<ListResult, DomainError> {
        let hashes = self.store.keys().await?;
        let result = ListResult::new(hashes);
        info!(size = result.size, "Listed token hashes in the blocklist");
        Ok(result)
    }

    /// Number of blocked digests
    pub async fn size(&self) -> Result<i64, DomainError> {
        self.store.size().await
    }

    pub async fn status(&self) -> Result<StatusResult, DomainError> {
        Ok(StatusResult {
            size: self.size().await?,
        })
    }
}
