//! Remote JWKS client with a process-wide cached key set.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use jb_core::errors::DomainError;
use jb_core::services::KeySetProvider;

use crate::InfrastructureError;

/// Timeout for a single key set request
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

struct CachedKeySet {
    keys: Arc<JwkSet>,
    fetched_at: Instant,
}

/// Fetches a JSON Web Key Set over HTTP and caches it.
///
/// The set is loaded on first use and refetched once it is older than the
/// refresh interval. Loads are serialized: callers arriving while a fetch is
/// in flight wait for it instead of issuing their own. When a refresh fails
/// the previous set keeps being served until the next interval.
pub struct JwksClient {
    url: String,
    http: reqwest::Client,
    refresh_interval: Duration,
    cache: Mutex<Option<CachedKeySet>>,
    fetches: AtomicUsize,
}

impl JwksClient {
    /// Create a client for `url`, refreshing every `refresh_minutes`
    pub fn new(url: impl Into<String>, refresh_minutes: u64) -> Result<Self, InfrastructureError> {
        let http = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;

        Ok(Self {
            url: url.into(),
            http,
            refresh_interval: Duration::from_secs(refresh_minutes.saturating_mul(60)),
            cache: Mutex::new(None),
            fetches: AtomicUsize::new(0),
        })
    }

    /// Override the refresh interval
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Number of HTTP fetches attempted so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    async fn fetch(&self) -> Result<JwkSet, InfrastructureError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        debug!("Fetching JWKS from {}", self.url);

        let body = self
            .http
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_key_set(&body)
    }
}

/// Decode a JWKS document
pub fn parse_key_set(body: &str) -> Result<JwkSet, InfrastructureError> {
    serde_json::from_str(body)
        .map_err(|e| InfrastructureError::InvalidResponse(format!("malformed JWKS document: {}", e)))
}

#[async_trait]
impl KeySetProvider for JwksClient {
    async fn key_set(&self) -> Result<Arc<JwkSet>, DomainError> {
        let mut cache = self.cache.lock().await;

        if let Some(cached) = cache.as_ref() {
            if cached.fetched_at.elapsed() < self.refresh_interval {
                return Ok(Arc::clone(&cached.keys));
            }
        }

        match self.fetch().await {
            Ok(keys) => {
                info!("Loaded {} keys from JWKS {}", keys.keys.len(), self.url);
                let keys = Arc::new(keys);
                *cache = Some(CachedKeySet {
                    keys: Arc::clone(&keys),
                    fetched_at: Instant::now(),
                });
                Ok(keys)
            }
            Err(e) => match cache.as_mut() {
                Some(stale) => {
                    warn!("JWKS refresh from {} failed, serving cached keys: {}", self.url, e);
                    stale.fetched_at = Instant::now();
                    Ok(Arc::clone(&stale.keys))
                }
                None => {
                    warn!("Failed to load JWKS from {}: {}", self.url, e);
                    Err(e.into())
                }
            },
        }
    }
}
