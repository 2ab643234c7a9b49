//! Shared configuration and common types for jwtblock
//!
//! This crate provides functionality used across all jwtblock crates:
//! - Layered configuration (defaults, YAML file, environment)
//! - The JSON error body used by the HTTP-shaped front ends
//! - Health check response types

pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{AppConfig, CacheConfig, HttpConfig, JwtConfig, LoggingConfig, TtlConfig, VerifyConfig};
pub use errors::{ErrorResponse, IntoErrorResponse};
pub use types::{HealthResponse, HealthStatus};
