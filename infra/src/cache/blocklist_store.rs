//! Redis-backed blocklist store
//!
//! One key per blocked token digest, holding a placeholder value. The key's
//! Redis TTL is the block lifetime; the selected database is the namespace.

use async_trait::async_trait;
use tracing::debug;

use jb_core::domain::value_objects::TokenDigest;
use jb_core::errors::DomainError;
use jb_core::repositories::{BlocklistStore, EntryTtl, KeyTtl};

use super::redis_client::RedisClient;

/// Placeholder stored under every digest key
const BLOCK_MARKER: &str = "1";

/// `BlocklistStore` over a Redis database
#[derive(Clone)]
pub struct RedisBlocklistStore {
    client: RedisClient,
}

impl RedisBlocklistStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// Underlying client, for health checks
    pub fn client(&self) -> &RedisClient {
        &self.client
    }
}

/// Translate a raw Redis `TTL` reply
pub(crate) fn key_ttl_from_reply(reply: i64) -> KeyTtl {
    match reply {
        -2 => KeyTtl::Missing,
        -1 => KeyTtl::Persistent,
        seconds if seconds >= 0 => KeyTtl::Expiring(seconds),
        _ => KeyTtl::Missing,
    }
}

#[async_trait]
impl BlocklistStore for RedisBlocklistStore {
    async fn insert_if_absent(&self, digest: &TokenDigest, ttl: EntryTtl) -> Result<bool, DomainError> {
        let inserted = match ttl {
            EntryTtl::Never => self.client.set_if_absent(digest.as_str(), BLOCK_MARKER, None).await?,
            EntryTtl::After(seconds) => {
                self.client
                    .set_if_absent(digest.as_str(), BLOCK_MARKER, Some(seconds))
                    .await?
            }
            EntryTtl::Elapsed => {
                // The record would evict at once; only report whether one was already there.
                debug!("Block lifetime already elapsed for {}", digest);
                !self.client.exists(digest.as_str()).await?
            }
        };
        Ok(inserted)
    }

    async fn remaining_ttl(&self, digest: &TokenDigest) -> Result<KeyTtl, DomainError> {
        let reply = self.client.ttl(digest.as_str()).await?;
        Ok(key_ttl_from_reply(reply))
    }

    async fn delete(&self, digest: &TokenDigest) -> Result<bool, DomainError> {
        Ok(self.client.delete(digest.as_str()).await?)
    }

    async fn keys(&self) -> Result<Vec<String>, DomainError> {
        Ok(self.client.keys().await?)
    }

    async fn size(&self) -> Result<i64, DomainError> {
        Ok(self.client.db_size().await?)
    }

    async fn clear(&self) -> Result<(), DomainError> {
        Ok(self.client.flush_db().await?)
    }
}
