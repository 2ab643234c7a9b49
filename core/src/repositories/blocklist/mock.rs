//! In-memory implementation of BlocklistStore for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::domain::value_objects::TokenDigest;
use crate::errors::DomainError;

use super::r#trait::{BlocklistStore, EntryTtl, KeyTtl};

/// Mock blocklist store with real expiry semantics
#[derive(Clone, Default)]
pub struct MockBlocklistStore {
    entries: Arc<RwLock<HashMap<String, Option<Instant>>>>,
    should_fail: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl MockBlocklistStore {
    /// Create a new mock store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail as if the cache were unreachable
    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Number of store calls made so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Seed a record directly, bypassing insert-if-absent
    pub async fn seed(&self, digest: &TokenDigest, ttl: EntryTtl) {
        let expiry = match ttl {
            EntryTtl::Never => None,
            EntryTtl::After(seconds) => Self::expiry_after(seconds),
            EntryTtl::Elapsed => return,
        };
        self.entries
            .write()
            .await
            .insert(digest.as_str().to_string(), expiry);
    }

    fn enter(&self) -> Result<(), DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::CacheUnavailable {
                message: "mock store unavailable".to_string(),
            });
        }
        Ok(())
    }

    /// Expiry instant, or none when it lies beyond what `Instant` can represent
    fn expiry_after(seconds: u64) -> Option<Instant> {
        Instant::now().checked_add(Duration::from_secs(seconds))
    }

    fn is_live(expiry: &Option<Instant>, now: Instant) -> bool {
        expiry.map_or(true, |at| at > now)
    }

    async fn purge_expired(&self) {
        let now = Instant::now();
        self.entries
            .write()
            .await
            .retain(|_, expiry| Self::is_live(expiry, now));
    }
}

#[async_trait]
impl BlocklistStore for MockBlocklistStore {
    async fn insert_if_absent(&self, digest: &TokenDigest, ttl: EntryTtl) -> Result<bool, DomainError> {
        self.enter()?;
        self.purge_expired().await;

        let mut entries = self.entries.write().await;
        if entries.contains_key(digest.as_str()) {
            return Ok(false);
        }

        let expiry = match ttl {
            EntryTtl::Never => None,
            EntryTtl::After(seconds) => Self::expiry_after(seconds),
            EntryTtl::Elapsed => return Ok(true),
        };
        entries.insert(digest.as_str().to_string(), expiry);
        Ok(true)
    }

    async fn remaining_ttl(&self, digest: &TokenDigest) -> Result<KeyTtl, DomainError> {
        self.enter()?;
        self.purge_expired().await;

        let entries = self.entries.read().await;
        Ok(match entries.get(digest.as_str()) {
            None => KeyTtl::Missing,
            Some(None) => KeyTtl::Persistent,
            Some(Some(at)) => {
                let remaining = at.saturating_duration_since(Instant::now());
                // Round to the nearest second, like Redis TTL
                KeyTtl::Expiring(((remaining.as_millis() + 500) / 1000) as i64)
            }
        })
    }

    async fn delete(&self, digest: &TokenDigest) -> Result<bool, DomainError> {
        self.enter()?;
        self.purge_expired().await;
        Ok(self.entries.write().await.remove(digest.as_str()).is_some())
    }

    async fn keys(&self) -> Result<Vec<String>, DomainError> {
        self.enter()?;
        self.purge_expired().await;
        Ok(self.entries.read().await.keys().cloned().collect())
    }

    async fn size(&self) -> Result<i64, DomainError> {
        self.enter()?;
        self.purge_expired().await;
        Ok(self.entries.read().await.len() as i64)
    }

    async fn clear(&self) -> Result<(), DomainError> {
        self.enter()?;
        self.entries.write().await.clear();
        Ok(())
    }
}
