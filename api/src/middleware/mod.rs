pub mod auth;
pub mod cors;

pub use auth::{bearer_from_request, parse_bearer, sha256_from_request};
pub use cors::{CorsHeaders, CorsPolicy};
