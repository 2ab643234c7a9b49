//! Shared fixtures for the front end tests

#![allow(dead_code)]

use std::sync::Arc;

use jsonwebtoken::{encode, get_current_timestamp, EncodingKey, Header};
use serde_json::json;

use jb_core::services::{BlocklistService, TokenVerifier, TtlPolicy, VerificationConfig};
use jb_core::MockBlocklistStore;
use jb_shared::config::{HttpConfig, JwtConfig};

pub const SECRET: &str = "foobar";
pub const ALLOWED_ORIGIN: &str = "https://app.example.com";

/// HS256 token signed with `secret`, expiring `exp_in` seconds from now
pub fn token_signed_with(secret: &str, exp_in: i64) -> String {
    let exp = get_current_timestamp() as i64 + exp_in;
    let claims = json!({ "sub": "user-1", "exp": exp });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

/// Valid token expiring in an hour
pub fn valid_token() -> String {
    token_signed_with(SECRET, 3600)
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig::default().with_hmac_secret(SECRET)
}

pub fn http_config() -> HttpConfig {
    HttpConfig::default().with_cors_origins([ALLOWED_ORIGIN])
}

/// Blocklist over a mock store; clones of `store` share its records
pub fn blocklist(store: &MockBlocklistStore) -> BlocklistService<MockBlocklistStore> {
    let jwt = jwt_config();
    let verifier = TokenVerifier::new(VerificationConfig::from(&jwt)).unwrap();
    BlocklistService::new(
        Arc::new(store.clone()),
        Arc::new(verifier),
        TtlPolicy::from(&jwt.ttl),
    )
}
