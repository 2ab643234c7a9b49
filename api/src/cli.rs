//! Command line interface

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use jb_shared::config::AppConfig;

/// jwtblock - a JWT blocklist & auth proxy service
#[derive(Parser, Debug)]
#[command(name = "jwtblock")]
#[command(version, about)]
#[command(
    long_about = "jwtblock is a blocklist & auth proxy service for JWTs, to support immediate termination of access, since access tokens cannot truly be revoked."
)]
pub struct Cli {
    /// Config file (default is ./.jwtblock.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug mode
    #[arg(long, global = true)]
    pub debug: bool,

    /// Use JSON output
    #[arg(long, global = true)]
    pub json: bool,

    /// Quiet CLI output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose CLI output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Redis connection URL
    #[arg(long, global = true)]
    pub redis_url: Option<String>,

    /// Redis DB number
    #[arg(long, global = true)]
    pub redis_dbnum: Option<i64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Block a JWT
    Block {
        /// Token to block
        jwt: String,

        /// TTL for token blocking in seconds (0 never expires)
        #[arg(short, long, allow_negative_numbers = true)]
        ttl: Option<i64>,
    },

    /// Check if a JWT is blocked
    Check(LookupArgs),

    /// Unblock a JWT
    Unblock(LookupArgs),

    /// Empty the blocklist
    Flush,

    /// List blocked JWT hashes
    List,

    /// Get status of the blocklist
    Status,

    /// Serve the web API
    Serve(ServeArgs),

    /// Serve AWS Lambda invocations
    Lambda,

    /// Print the version of jwtblock
    Version,
}

/// A token, or the SHA256 digest of one
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct LookupArgs {
    /// Token to look up
    #[arg(required_unless_present = "sha256", conflicts_with = "sha256")]
    pub jwt: Option<String>,

    /// SHA256 of the token instead of the token itself
    #[arg(long, value_name = "HASH")]
    pub sha256: Option<String>,
}

/// Token or digest selected by `LookupArgs`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Jwt(String),
    Sha256(String),
}

impl LookupArgs {
    pub fn lookup(&self) -> Lookup {
        match (&self.jwt, &self.sha256) {
            (_, Some(sha256)) => Lookup::Sha256(sha256.clone()),
            (Some(jwt), None) => Lookup::Jwt(jwt.clone()),
            (None, None) => Lookup::Jwt(String::new()),
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ServeArgs {
    /// Hostname to listen on
    #[arg(long)]
    pub hostname: Option<String>,

    /// TCP port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// HTTP response code when token is allowed
    #[arg(long)]
    pub status_on_allowed: Option<u16>,

    /// HTTP response code when token is blocked
    #[arg(long)]
    pub status_on_blocked: Option<u16>,
}

impl Cli {
    /// Apply flag values on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(url) = &self.redis_url {
            config.redis.url = url.clone();
        }
        if let Some(db) = self.redis_dbnum {
            config.redis.database = db.max(0);
        }

        match &self.command {
            Some(Command::Serve(serve)) => {
                if let Some(hostname) = &serve.hostname {
                    config.http.hostname = hostname.clone();
                }
                if let Some(port) = serve.port {
                    config.http.port = port;
                }
                if let Some(status) = serve.status_on_allowed {
                    config.http.status_on_allowed = status;
                }
                if let Some(status) = serve.status_on_blocked {
                    config.http.status_on_blocked = status;
                }
            }
            Some(Command::Block { ttl: Some(ttl), .. }) => {
                config.jwt.ttl.sec_specified = *ttl;
            }
            _ => {}
        }
    }

    /// Whether the banner is printed before command output
    pub fn show_banner(&self) -> bool {
        !self.quiet && !self.json
    }

    /// Logger filter for this invocation
    pub fn log_filter(&self, config: &AppConfig) -> String {
        config.logging.filter(self.debug, self.verbose)
    }
}
