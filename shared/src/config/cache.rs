//! Cache configuration module

use serde::{Deserialize, Serialize};

/// Redis connection configuration for the blocklist namespace
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Redis logical database holding the blocklist
    pub database: i64,

    /// ACL username, overrides the one in the URL
    pub username: Option<String>,

    /// Password, overrides the one in the URL
    pub password: Option<String>,

    /// Connection timeout in seconds
    pub connection_timeout: u64,

    /// Response timeout in seconds, applied to every command
    pub response_timeout: u64,

    /// Connection attempts made at startup before giving up
    pub max_retries: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            database: 0,
            username: None,
            password: None,
            connection_timeout: 5,
            response_timeout: 5,
            max_retries: 3,
        }
    }
}

impl CacheConfig {
    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the database number
    pub fn with_database(mut self, db: i64) -> Self {
        self.database = db.max(0);
        self
    }
}
