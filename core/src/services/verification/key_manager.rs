//! Static verification keys loaded once from configuration

use std::fs;
use std::path::Path;

use jsonwebtoken::{Algorithm, DecodingKey};

use crate::errors::{DomainError, TokenError};

const RSA_ALGORITHMS: [Algorithm; 6] = [
    Algorithm::RS256,
    Algorithm::RS384,
    Algorithm::RS512,
    Algorithm::PS256,
    Algorithm::PS384,
    Algorithm::PS512,
];
const EC_ALGORITHMS: [Algorithm; 2] = [Algorithm::ES256, Algorithm::ES384];
const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// A decoding key plus the signature algorithms it may verify
#[derive(Clone)]
pub struct VerificationKey {
    key: DecodingKey,
    algorithms: Vec<Algorithm>,
}

impl std::fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationKey")
            .field("algorithms", &self.algorithms)
            .finish()
    }
}

impl VerificationKey {
    /// Load an RSA public key, falling back to EC.
    ///
    /// `value` is PEM text or a path to a PEM file.
    pub fn asymmetric(value: &str) -> Result<Self, DomainError> {
        let pem = read_pem(value)?;

        if let Ok(key) = DecodingKey::from_rsa_pem(&pem) {
            return Ok(Self {
                key,
                algorithms: RSA_ALGORITHMS.to_vec(),
            });
        }

        DecodingKey::from_ec_pem(&pem)
            .map(|key| Self {
                key,
                algorithms: EC_ALGORITHMS.to_vec(),
            })
            .map_err(|e| {
                DomainError::Token(TokenError::KeyLoad {
                    message: format!("Invalid public key format: {}", e),
                })
            })
    }

    /// Shared HMAC secret, used as raw bytes
    pub fn symmetric(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            algorithms: HMAC_ALGORITHMS.to_vec(),
        }
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.key
    }

    pub fn algorithms(&self) -> &[Algorithm] {
        &self.algorithms
    }

    pub fn supports(&self, algorithm: Algorithm) -> bool {
        self.algorithms.contains(&algorithm)
    }
}

fn read_pem(value: &str) -> Result<Vec<u8>, DomainError> {
    let trimmed = value.trim();
    if trimmed.starts_with("-----BEGIN") {
        return Ok(trimmed.as_bytes().to_vec());
    }

    fs::read(Path::new(trimmed)).map_err(|e| {
        DomainError::Token(TokenError::KeyLoad {
            message: format!("Failed to read public key {}: {}", trimmed, e),
        })
    })
}
