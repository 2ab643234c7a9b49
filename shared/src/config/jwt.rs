//! Token handling configuration: pipeline stages, key material and TTL policy

use serde::{Deserialize, Serialize};

/// JWT pipeline configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct JwtConfig {
    /// Structural decode stage
    pub parse: StageConfig,

    /// Temporal claim validation stage
    pub validate: StageConfig,

    /// Signature verification stage and its key material
    pub verify: VerifyConfig,

    /// Block record lifetime policy
    pub ttl: TtlConfig,
}

impl JwtConfig {
    /// Configuration that only parses tokens, without validating or verifying them
    pub fn parse_only() -> Self {
        Self {
            validate: StageConfig { enabled: false },
            ..Default::default()
        }
    }

    /// Enable signature verification with a shared HMAC secret
    pub fn with_hmac_secret(mut self, secret: impl Into<String>) -> Self {
        self.verify.enabled = true;
        self.verify.hmac_secret = secret.into();
        self
    }

    /// Enable signature verification with an RSA or EC public key (inline PEM or a file path)
    pub fn with_rsa_key(mut self, key: impl Into<String>) -> Self {
        self.verify.enabled = true;
        self.verify.rsa_key = key.into();
        self
    }

    /// Enable signature verification against a remote JWKS endpoint
    pub fn with_jwks_url(mut self, url: impl Into<String>) -> Self {
        self.verify.enabled = true;
        self.verify.jwks_url = url.into();
        self
    }
}

/// Enable switch for a single pipeline stage
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct StageConfig {
    pub enabled: bool,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Signature verification settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct VerifyConfig {
    /// Whether signatures are checked at all
    pub enabled: bool,

    /// RSA/EC public key, either PEM text or a path to a PEM file
    pub rsa_key: String,

    /// HMAC shared secret
    pub hmac_secret: String,

    /// Remote JWKS endpoint
    pub jwks_url: String,

    /// Minimum interval between JWKS refreshes
    #[serde(default = "default_jwks_refresh_minutes")]
    pub jwks_refresh_minutes: u64,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            rsa_key: String::new(),
            hmac_secret: String::new(),
            jwks_url: String::new(),
            jwks_refresh_minutes: default_jwks_refresh_minutes(),
        }
    }
}

/// TTL policy for block records
///
/// Seconds are signed: `sec_specified = -1` means "not specified", and a
/// resolved TTL of `0` means the record never expires.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TtlConfig {
    /// Deployment default TTL
    pub sec_default: i64,

    /// Explicit TTL used by the CLI when no `--ttl` flag is passed
    pub sec_specified: i64,

    /// Padding added to a TTL derived from the token's `exp` claim
    pub sec_padding: i64,

    /// Derive the TTL from the token's `exp` claim when possible
    pub use_token_exp: bool,

    /// Reject tokens without an `exp` claim
    pub require_token_exp: bool,
}

impl Default for TtlConfig {
    fn default() -> Self {
        Self {
            sec_default: 7200, // 2 hours
            sec_specified: -1,
            sec_padding: 5,
            use_token_exp: true,
            require_token_exp: false,
        }
    }
}

fn default_jwks_refresh_minutes() -> u64 {
    15
}
