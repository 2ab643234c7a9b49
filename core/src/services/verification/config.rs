//! Configuration for the token verification pipeline

use jb_shared::config::JwtConfig;

/// Where signature verification keys come from.
///
/// At most one source is effective. Static keys take precedence so that a
/// configured key never couples verification to a remote endpoint.
#[derive(Clone, PartialEq, Eq)]
pub enum KeySource {
    /// No key material configured
    None,
    /// RSA or EC public key, PEM text or path to a PEM file
    Asymmetric(String),
    /// HMAC shared secret
    Symmetric(String),
    /// Remote JWKS endpoint
    RemoteUrl(String),
}

impl KeySource {
    /// Pick the effective source: asymmetric, then symmetric, then remote. Blank values are unset.
    pub fn resolve(rsa_key: &str, hmac_secret: &str, jwks_url: &str) -> Self {
        if !rsa_key.trim().is_empty() {
            KeySource::Asymmetric(rsa_key.to_string())
        } else if !hmac_secret.is_empty() {
            KeySource::Symmetric(hmac_secret.to_string())
        } else if !jwks_url.trim().is_empty() {
            KeySource::RemoteUrl(jwks_url.trim().to_string())
        } else {
            KeySource::None
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            KeySource::None => "none",
            KeySource::Asymmetric(_) => "asymmetric",
            KeySource::Symmetric(_) => "symmetric",
            KeySource::RemoteUrl(_) => "remote",
        }
    }
}

// Key material stays out of logs
impl std::fmt::Debug for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySource::RemoteUrl(url) => f.debug_tuple("RemoteUrl").field(url).finish(),
            other => f.write_str(other.kind()),
        }
    }
}

/// Stage toggles and key source, resolved once at startup
#[derive(Debug, Clone)]
pub struct VerificationConfig {
    /// Structural decode; when off every token passes with empty claims
    pub parse: bool,
    /// Temporal claim checks (`exp`, `nbf`)
    pub validate: bool,
    /// Signature verification
    pub verify: bool,
    /// Reject tokens without `exp` (only while validating)
    pub require_exp: bool,
    pub key_source: KeySource,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self::from(&JwtConfig::default())
    }
}

impl From<&JwtConfig> for VerificationConfig {
    fn from(config: &JwtConfig) -> Self {
        Self {
            parse: config.parse.enabled,
            validate: config.validate.enabled,
            verify: config.verify.enabled,
            require_exp: config.ttl.require_token_exp,
            key_source: KeySource::resolve(
                &config.verify.rsa_key,
                &config.verify.hmac_secret,
                &config.verify.jwks_url,
            ),
        }
    }
}
