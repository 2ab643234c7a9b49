//! Configuration module
//!
//! - `jwt` - pipeline stages, key material and TTL policy
//! - `cache` - Redis connection for the blocklist
//! - `server` - HTTP front end and CORS
//! - `environment` - logging
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! `JWTBLOCK_`-prefixed environment variables (nested keys separated by
//! `__`). Command line flags are applied on top by the binary.

pub mod cache;
pub mod environment;
pub mod jwt;
pub mod server;

use std::path::Path;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

pub use cache::CacheConfig;
pub use environment::LoggingConfig;
pub use jwt::{JwtConfig, StageConfig, TtlConfig, VerifyConfig};
pub use server::HttpConfig;

/// Configuration file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = ".jwtblock.yaml";

/// Prefix of recognized environment variables
pub const ENV_PREFIX: &str = "JWTBLOCK";

/// Complete application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Token pipeline and TTL policy
    pub jwt: JwtConfig,

    /// Blocklist cache
    pub redis: CacheConfig,

    /// HTTP front end
    pub http: HttpConfig,

    /// Logging
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from the optional YAML file and the environment.
    ///
    /// An explicitly given file must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let file = match path {
            Some(path) => File::from(path).format(FileFormat::Yaml).required(true),
            None => File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("http.cors_allowed_origins")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load_with_env(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Config::builder()
            .add_source(env_source().source(Some(vars)))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = load_with_env(&[]);
        assert!(config.jwt.parse.enabled);
        assert_eq!(config.http.port, 4474);
        assert_eq!(config.redis.url, "redis://localhost:6379");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_environment_overrides() {
        let config = load_with_env(&[
            ("JWTBLOCK_JWT__VERIFY__ENABLED", "true"),
            ("JWTBLOCK_JWT__VERIFY__HMAC_SECRET", "foobar"),
            ("JWTBLOCK_JWT__TTL__SEC_PADDING", "85"),
            ("JWTBLOCK_HTTP__PORT", "8080"),
            ("JWTBLOCK_REDIS__DATABASE", "3"),
        ]);
        assert!(config.jwt.verify.enabled);
        assert_eq!(config.jwt.verify.hmac_secret, "foobar");
        assert_eq!(config.jwt.ttl.sec_padding, 85);
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.redis.database, 3);
    }

    #[test]
    fn test_cors_origins_parsed_as_list() {
        let config = load_with_env(&[(
            "JWTBLOCK_HTTP__CORS_ALLOWED_ORIGINS",
            "https://a.example,https://b.example",
        )]);
        assert_eq!(
            config.http.cors_allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }
}
