//! Token verification pipeline: parse, validate, verify.

use std::sync::Arc;

use jsonwebtoken::jwk::{Jwk, PublicKeyUse};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Header, Validation};
use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::value_objects::{TokenDigest, VerifiedClaims};
use crate::errors::{DomainError, TokenError};

use super::config::{KeySource, VerificationConfig};
use super::key_manager::VerificationKey;
use super::traits::KeySetProvider;

/// Runs the configurable check chain on raw tokens.
///
/// Every enabled stage must pass; the first failing stage ends the run
/// with its own error. Static keys are loaded once, at construction.
pub struct TokenVerifier {
    config: VerificationConfig,
    static_key: Option<VerificationKey>,
    key_sets: Option<Arc<dyn KeySetProvider>>,
}

impl TokenVerifier {
    /// Build a verifier, loading any static key material
    ///
    /// # Returns
    ///
    /// * `Ok(TokenVerifier)` - Ready to check tokens
    /// * `Err(DomainError)` - The configured RSA/EC key could not be loaded
    pub fn new(config: VerificationConfig) -> Result<Self, DomainError> {
        let static_key = if config.verify {
            match &config.key_source {
                KeySource::Asymmetric(value) => Some(VerificationKey::asymmetric(value)?),
                KeySource::Symmetric(secret) => Some(VerificationKey::symmetric(secret)),
                KeySource::RemoteUrl(_) | KeySource::None => None,
            }
        } else {
            None
        };

        debug!(
            parse = config.parse,
            validate = config.validate,
            verify = config.verify,
            require_exp = config.require_exp,
            key_source = config.key_source.kind(),
            "Token verifier configured"
        );

        Ok(Self {
            config,
            static_key,
            key_sets: None,
        })
    }

    /// Attach the remote key set used when the key source is a JWKS URL
    pub fn with_key_set_provider(mut self, provider: Arc<dyn KeySetProvider>) -> Self {
        self.key_sets = Some(provider);
        self
    }

    pub fn config(&self) -> &VerificationConfig {
        &self.config
    }

    /// Whether checks will consult a remote key set
    pub fn uses_remote_keys(&self) -> bool {
        self.config.verify && matches!(self.config.key_source, KeySource::RemoteUrl(_))
    }

    /// Run the enabled stages on a token
    ///
    /// # Returns
    ///
    /// * `Ok(VerifiedClaims)` - Decoded claims, empty when parsing is disabled
    /// * `Err(DomainError)` - The first failing stage's error
    pub async fn run_checks(&self, token: &str) -> Result<VerifiedClaims, DomainError> {
        if !self.config.parse {
            debug!("JWT parse disabled");
            return Ok(VerifiedClaims::empty());
        }

        if self.config.verify && self.config.key_source == KeySource::None {
            debug!("No key or algorithm defined for JWT verification");
            return Err(DomainError::NoVerificationKeyConfigured);
        }

        let result = self.decode_token(token).await;
        match &result {
            Ok(_) => debug!(sha256 = %TokenDigest::of_token(token), "JWT checks passed"),
            Err(e) => debug!(sha256 = %TokenDigest::of_token(token), error = %e, "JWT checks failed"),
        }
        result
    }

    async fn decode_token(&self, token: &str) -> Result<VerifiedClaims, DomainError> {
        let header = decode_header(token).map_err(|e| TokenError::from_jwt_error(&e))?;
        let mut validation = self.validation(header.alg);

        if !self.config.verify {
            validation.insecure_disable_signature_validation();
            return decode_claims(token, &DecodingKey::from_secret(&[]), &validation);
        }

        match &self.static_key {
            Some(key) => {
                if !key.supports(header.alg) {
                    return Err(TokenError::UnsupportedAlgorithm {
                        algorithm: format!("{:?}", header.alg),
                    }
                    .into());
                }
                validation.algorithms = key.algorithms().to_vec();
                decode_claims(token, key.decoding_key(), &validation)
            }
            None => self.decode_with_key_set(token, &header, validation).await,
        }
    }

    fn validation(&self, algorithm: Algorithm) -> Validation {
        let mut validation = Validation::new(algorithm);
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.validate_exp = self.config.validate;
        validation.validate_nbf = self.config.validate;
        validation.required_spec_claims.clear();
        if self.config.validate && self.config.require_exp {
            validation.set_required_spec_claims(&["exp"]);
        }
        validation
    }

    async fn decode_with_key_set(
        &self,
        token: &str,
        header: &Header,
        mut validation: Validation,
    ) -> Result<VerifiedClaims, DomainError> {
        let provider = self.key_sets.as_ref().ok_or_else(|| TokenError::KeySetUnavailable {
            message: "no key set provider configured".to_string(),
        })?;
        let key_set = provider.key_set().await?;
        validation.algorithms = vec![header.alg];

        let candidates: Vec<&Jwk> = match &header.kid {
            Some(kid) => key_set.find(kid).into_iter().collect(),
            None => key_set
                .keys
                .iter()
                .filter(|jwk| jwk.common.public_key_use != Some(PublicKeyUse::Encryption))
                .collect(),
        };

        if candidates.is_empty() {
            return Err(TokenError::KeyLoad {
                message: match &header.kid {
                    Some(kid) => format!("no key found for key ID {}", kid),
                    None => "key set contains no signing keys".to_string(),
                },
            }
            .into());
        }

        let mut last_error = TokenError::InvalidSignature;
        for jwk in candidates {
            let key = match DecodingKey::from_jwk(jwk) {
                Ok(key) => key,
                Err(e) => {
                    last_error = TokenError::from_jwt_error(&e);
                    continue;
                }
            };

            match decode::<Map<String, Value>>(token, &key, &validation) {
                Ok(data) => return Ok(VerifiedClaims::new(data.claims)),
                Err(e) => {
                    let error = TokenError::from_jwt_error(&e);
                    // Only key mismatches are worth trying the next key for
                    match error {
                        TokenError::InvalidSignature
                        | TokenError::UnsupportedAlgorithm { .. }
                        | TokenError::KeyLoad { .. } => last_error = error,
                        other => return Err(other.into()),
                    }
                }
            }
        }

        Err(last_error.into())
    }
}

fn decode_claims(
    token: &str,
    key: &DecodingKey,
    validation: &Validation,
) -> Result<VerifiedClaims, DomainError> {
    decode::<Map<String, Value>>(token, key, validation)
        .map(|data| VerifiedClaims::new(data.claims))
        .map_err(|e| TokenError::from_jwt_error(&e).into())
}
