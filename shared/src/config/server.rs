//! HTTP server and CORS configuration

use serde::{Deserialize, Serialize};

/// HTTP front end configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Address to bind
    pub hostname: String,

    /// Port to bind
    pub port: u16,

    /// Header carrying a SHA256 digest on check requests
    pub http_header_sha256: String,

    /// Status code returned when a checked token is not blocked
    pub status_on_allowed: u16,

    /// Status code returned when a checked token is blocked or unusable
    pub status_on_blocked: u16,

    /// Allowed CORS origins; `*` allows every origin
    pub cors_allowed_origins: Vec<String>,

    /// Preflight cache lifetime
    pub cors_max_seconds: u64,

    /// Seconds a client has to send the request head
    pub read_header_timeout: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            hostname: String::from("0.0.0.0"),
            port: 4474,
            http_header_sha256: String::from("x-jwtblock-sha256"),
            status_on_allowed: 200,
            status_on_blocked: 401,
            cors_allowed_origins: Vec::new(),
            cors_max_seconds: 86400,
            read_header_timeout: 5,
        }
    }
}

impl HttpConfig {
    /// Create a new HTTP configuration
    pub fn new(hostname: impl Into<String>, port: u16) -> Self {
        Self {
            hostname: hostname.into(),
            port,
            ..Default::default()
        }
    }

    /// Replace the CORS allow-list
    pub fn with_cors_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cors_allowed_origins = origins.into_iter().map(Into::into).collect();
        self
    }

    /// Get the bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.hostname, self.port)
    }
}
