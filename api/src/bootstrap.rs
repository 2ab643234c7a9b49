//! Wiring of configuration into ready-to-use services.

use std::sync::Arc;

use anyhow::Context;

use jb_core::services::{BlocklistService, KeySource, TokenVerifier, TtlPolicy, VerificationConfig};
use jb_infra::cache::{mask_url, RedisBlocklistStore, RedisClient};
use jb_infra::jwks::JwksClient;
use jb_shared::config::{AppConfig, JwtConfig};

/// Blocklist backed by Redis
pub type RedisBlocklist = BlocklistService<RedisBlocklistStore>;

/// Build the token verifier, attaching a JWKS client when keys are remote
pub fn build_verifier(config: &JwtConfig) -> anyhow::Result<TokenVerifier> {
    let verification = VerificationConfig::from(config);
    let remote_url = match &verification.key_source {
        KeySource::RemoteUrl(url) if verification.verify => Some(url.clone()),
        _ => None,
    };

    let verifier = TokenVerifier::new(verification).context("failed to load verification key")?;

    match remote_url {
        Some(url) => {
            log::debug!("Using JWKS from {}", url);
            let jwks = JwksClient::new(url, config.verify.jwks_refresh_minutes)
                .context("failed to create JWKS client")?;
            Ok(verifier.with_key_set_provider(Arc::new(jwks)))
        }
        None => Ok(verifier),
    }
}

/// Connect to Redis and assemble the blocklist service
pub async fn build_blocklist(config: &AppConfig) -> anyhow::Result<RedisBlocklist> {
    let verifier = build_verifier(&config.jwt)?;

    log::debug!(
        "Connecting to Redis at {} (db {})",
        mask_url(&config.redis.url),
        config.redis.database
    );
    let client = RedisClient::new(config.redis.clone())
        .await
        .context("failed to connect to Redis")?;

    Ok(BlocklistService::new(
        Arc::new(RedisBlocklistStore::new(client)),
        Arc::new(verifier),
        TtlPolicy::from(&config.jwt.ttl),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_keys_get_a_provider() {
        let config = JwtConfig::default().with_jwks_url("https://issuer.example/.well-known/jwks.json");
        let verifier = build_verifier(&config).unwrap();
        assert!(verifier.uses_remote_keys());
    }

    #[test]
    fn test_static_secret() {
        let verifier = build_verifier(&JwtConfig::default().with_hmac_secret("foobar")).unwrap();
        assert!(!verifier.uses_remote_keys());
        assert!(matches!(verifier.config().key_source, KeySource::Symmetric(_)));
    }

    #[test]
    fn test_unloadable_rsa_key() {
        let config = JwtConfig::default().with_rsa_key("/nonexistent/key.pem");
        assert!(build_verifier(&config).is_err());
    }
}
