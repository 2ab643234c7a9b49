//! Blocklist store trait: the expiring key-value namespace holding block records.

use async_trait::async_trait;

use crate::domain::value_objects::TokenDigest;
use crate::errors::DomainError;

/// Lifetime requested for a new block record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryTtl {
    /// Record never expires
    Never,
    /// Record expires after the given number of seconds
    After(u64),
    /// Lifetime already elapsed; the record would evict immediately
    Elapsed,
}

impl EntryTtl {
    /// Map resolved TTL seconds onto a record lifetime (`0` is the infinite sentinel)
    pub fn from_seconds(seconds: i64) -> Self {
        match seconds {
            0 => EntryTtl::Never,
            s if s > 0 => EntryTtl::After(s as u64),
            _ => EntryTtl::Elapsed,
        }
    }
}

/// Remaining lifetime of a key, as reported by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTtl {
    /// No record for the key
    Missing,
    /// Record present without expiry
    Persistent,
    /// Record present, expiring in the given number of seconds
    Expiring(i64),
}

/// Repository trait for block records
///
/// Implementations must make `insert_if_absent` atomic: two concurrent
/// inserts of the same digest never both report a new record. Every
/// failure to reach the store is reported as `DomainError::CacheUnavailable`.
#[async_trait]
pub trait BlocklistStore: Send + Sync {
    /// Insert a record unless one already exists
    ///
    /// # Returns
    /// * `Ok(true)` - Record created
    /// * `Ok(false)` - Record already present, its TTL is left untouched
    async fn insert_if_absent(&self, digest: &TokenDigest, ttl: EntryTtl) -> Result<bool, DomainError>;

    /// Remaining lifetime of the record for a digest
    async fn remaining_ttl(&self, digest: &TokenDigest) -> Result<KeyTtl, DomainError>;

    /// Delete the record for a digest
    ///
    /// # Returns
    /// * `Ok(true)` - A record existed and was removed
    /// * `Ok(false)` - No record existed
    async fn delete(&self, digest: &TokenDigest) -> Result<bool, DomainError>;

    /// Every key in the namespace. Unbounded scan, for operational use only.
    async fn keys(&self) -> Result<Vec<String>, DomainError>;

    /// Number of records in the namespace
    async fn size(&self) -> Result<i64, DomainError>;

    /// Remove every record in the namespace
    async fn clear(&self) -> Result<(), DomainError>;
}
