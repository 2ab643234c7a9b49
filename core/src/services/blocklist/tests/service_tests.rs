//! Tests for blocklist operations against the in-memory store

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use crate::domain::value_objects::{TokenDigest, MAX_TTL_SECONDS};
use crate::errors::{DomainError, TokenError};
use crate::repositories::blocklist::{BlocklistStore, EntryTtl, KeyTtl, MockBlocklistStore};
use crate::services::blocklist::BlocklistService;
use crate::services::ttl::TtlPolicy;
use crate::services::verification::tests::mocks::{
    claims_expiring_in, hs256_token, hs256_token_with_secret, now, HMAC_SECRET,
};
use crate::services::verification::{KeySource, TokenVerifier, VerificationConfig};

fn verifier() -> Arc<TokenVerifier> {
    Arc::new(
        TokenVerifier::new(VerificationConfig {
            parse: true,
            validate: true,
            verify: true,
            require_exp: false,
            key_source: KeySource::Symmetric(HMAC_SECRET.to_string()),
        })
        .unwrap(),
    )
}

fn service_with(policy: TtlPolicy) -> (BlocklistService<MockBlocklistStore>, Arc<MockBlocklistStore>) {
    let store = Arc::new(MockBlocklistStore::new());
    (BlocklistService::new(store.clone(), verifier(), policy), store)
}

fn service() -> (BlocklistService<MockBlocklistStore>, Arc<MockBlocklistStore>) {
    service_with(TtlPolicy::new(7200, 0, true))
}

#[tokio::test]
async fn test_block_then_check_reports_blocked() {
    let (service, _) = service();
    let token = hs256_token(&claims_expiring_in(1800));

    let blocked = service.block(&token, -1).await.unwrap();
    assert!(blocked.is_new);
    assert_eq!(blocked.message, "Token blocked");
    assert!((1797..=1800).contains(&blocked.ttl_seconds));

    let check = service.check_by_jwt(&token).await.unwrap();
    assert!(check.blocked);
    assert!(check.ttl_seconds > 0 && check.ttl_seconds <= 1800);
    assert_eq!(check.message, "JWT is blocked");
}

#[tokio::test]
async fn test_reblock_keeps_original_ttl() {
    let (service, store) = service();
    let token = hs256_token(&claims_expiring_in(1800));

    assert!(service.block(&token, 60).await.unwrap().is_new);
    let second = service.block(&token, 600).await.unwrap();
    assert!(!second.is_new);
    assert_eq!(second.message, "Token already blocked");

    match store.remaining_ttl(&TokenDigest::of_token(&token)).await.unwrap() {
        KeyTtl::Expiring(seconds) => assert!((59..=60).contains(&seconds)),
        other => panic!("unexpected ttl {:?}", other),
    }
}

#[tokio::test]
async fn test_block_with_zero_ttl_never_expires() {
    let (service, _) = service();
    let token = hs256_token(&claims_expiring_in(1800));

    let blocked = service.block(&token, 0).await.unwrap();
    assert_eq!(blocked.ttl_seconds, 0);
    assert_eq!(blocked.ttl_display, "Inf");

    let check = service.check_by_jwt(&token).await.unwrap();
    assert!(check.blocked);
    assert_eq!(check.ttl_seconds, 0);
    assert_eq!(check.ttl_display, "Inf");
}

#[tokio::test]
async fn test_block_without_exp_uses_default_ttl() {
    let (service, _) = service_with(TtlPolicy::new(7200, 5, true));
    let token = hs256_token(&json!({ "sub": "user-1", "iat": now() }));

    let blocked = service.block(&token, -1).await.unwrap();
    assert_eq!(blocked.ttl_seconds, 7200);
    assert_eq!(blocked.ttl_display, "2h0m0s");
}

#[tokio::test]
async fn test_block_rejects_unverified_token_without_touching_store() {
    let (service, store) = service();
    let forged = hs256_token_with_secret(&claims_expiring_in(1800), "not-the-secret");

    let result = service.block(&forged, -1).await;
    assert!(matches!(result, Err(DomainError::Token(TokenError::InvalidSignature))));
    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn test_check_by_sha256() {
    let (service, store) = service();

    let absent = TokenDigest::of_token("absent");
    let check = service.check_by_sha256(absent.as_str()).await.unwrap();
    assert!(!check.blocked);
    assert_eq!(check.ttl_seconds, -1);
    assert_eq!(check.ttl_display, "");

    let forever = TokenDigest::of_token("forever");
    store.seed(&forever, EntryTtl::Never).await;
    let check = service.check_by_sha256(forever.as_str()).await.unwrap();
    assert!(check.blocked);
    assert_eq!(check.ttl_display, "Inf");

    let minute = TokenDigest::of_token("minute");
    store.seed(&minute, EntryTtl::After(60)).await;
    let check = service.check_by_sha256(&minute.as_str().to_uppercase()).await.unwrap();
    assert!(check.blocked);
    assert!((59..=60).contains(&check.ttl_seconds));
}

#[tokio::test]
async fn test_malformed_digest_never_reaches_store() {
    let (service, store) = service();

    assert!(matches!(
        service.check_by_sha256("*").await,
        Err(DomainError::MalformedDigest)
    ));
    assert!(matches!(
        service.unblock_by_sha256("abc").await,
        Err(DomainError::MalformedDigest)
    ));
    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn test_unblock_reports_presence() {
    let (service, _) = service();
    let token = hs256_token(&claims_expiring_in(1800));
    service.block(&token, -1).await.unwrap();

    let removed = service.unblock_by_jwt(&token).await.unwrap();
    assert!(removed.unblocked);
    assert_eq!(removed.message, "Token unblocked");

    let again = service
        .unblock_by_sha256(TokenDigest::of_token(&token).as_str())
        .await
        .unwrap();
    assert!(!again.unblocked);
    assert_eq!(again.message, "Token is not blocked");

    assert!(!service.check_by_jwt(&token).await.unwrap().blocked);
}

#[tokio::test]
async fn test_flush_returns_prior_count() {
    let (service, _) = service();
    for i in 0..3 {
        let token = hs256_token(&json!({ "sub": format!("user-{}", i), "exp": now() + 600 }));
        service.block(&token, -1).await.unwrap();
    }

    let flushed = service.flush().await.unwrap();
    assert_eq!(flushed.count, 3);
    assert!(!flushed.error);
    assert_eq!(service.size().await.unwrap(), 0);
}

#[tokio::test]
async fn test_list_and_status() {
    let (service, _) = service();
    let token = hs256_token(&claims_expiring_in(600));
    service.block(&token, -1).await.unwrap();

    let listed = service.list().await.unwrap();
    assert_eq!(listed.size, 1);
    assert_eq!(listed.token_hashes, vec![TokenDigest::of_token(&token).to_string()]);

    assert_eq!(service.status().await.unwrap().size, 1);
}

#[tokio::test]
async fn test_expired_token_block_is_not_stored() {
    let verifier = Arc::new(
        TokenVerifier::new(VerificationConfig {
            parse: true,
            validate: false,
            verify: false,
            require_exp: false,
            key_source: KeySource::None,
        })
        .unwrap(),
    );
    let store = Arc::new(MockBlocklistStore::new());
    let service = BlocklistService::new(store.clone(), verifier, TtlPolicy::new(7200, 0, true));
    let token = hs256_token(&claims_expiring_in(-120));

    let blocked = service.block(&token, -1).await.unwrap();
    assert!(blocked.ttl_seconds < 0);
    assert_eq!(store.size().await.unwrap(), 0);
}

#[tokio::test]
async fn test_cache_failure_surfaces_as_error() {
    let (service, store) = service();
    store.set_should_fail(true);
    let token = hs256_token(&claims_expiring_in(600));

    assert!(matches!(
        service.check_by_jwt(&token).await,
        Err(DomainError::CacheUnavailable { .. })
    ));
    assert!(matches!(
        service.block(&token, -1).await,
        Err(DomainError::CacheUnavailable { .. })
    ));
    assert!(service.flush().await.is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_blocks_report_one_new_record() {
    let (service, store) = service();
    let token = hs256_token(&claims_expiring_in(1800));

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let service = service.clone();
            let token = token.clone();
            tokio::spawn(async move { service.block(&token, -1).await })
        })
        .collect();

    let mut new_records = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap().is_new {
            new_records += 1;
        }
    }
    assert_eq!(new_records, 1);
    assert_eq!(store.size().await.unwrap(), 1);
}

#[tokio::test]
async fn test_block_with_huge_ttl_is_capped() {
    let (service, store) = service();
    let token = hs256_token(&claims_expiring_in(1800));

    let blocked = service.block(&token, i64::MAX).await.unwrap();
    assert!(blocked.is_new);
    assert_eq!(blocked.ttl_seconds, MAX_TTL_SECONDS);
    assert_eq!(store.size().await.unwrap(), 1);
}

/// Store whose every record is about to expire
struct ExpiringStore;

#[async_trait]
impl BlocklistStore for ExpiringStore {
    async fn insert_if_absent(&self, _: &TokenDigest, _: EntryTtl) -> Result<bool, DomainError> {
        Ok(false)
    }

    async fn remaining_ttl(&self, _: &TokenDigest) -> Result<KeyTtl, DomainError> {
        Ok(KeyTtl::Expiring(0))
    }

    async fn delete(&self, _: &TokenDigest) -> Result<bool, DomainError> {
        Ok(false)
    }

    async fn keys(&self) -> Result<Vec<String>, DomainError> {
        Ok(Vec::new())
    }

    async fn size(&self) -> Result<i64, DomainError> {
        Ok(1)
    }

    async fn clear(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

#[tokio::test]
async fn test_record_about_to_expire_is_not_reported_infinite() {
    let service = BlocklistService::new(Arc::new(ExpiringStore), verifier(), TtlPolicy::new(7200, 0, true));
    let digest = TokenDigest::of_token("expiring");

    let check = service.check_by_sha256(digest.as_str()).await.unwrap();
    assert!(check.blocked);
    assert_eq!(check.ttl_seconds, 1);
    assert_eq!(check.ttl_display, "1s");
}
