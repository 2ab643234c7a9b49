//! Value objects representing immutable domain concepts.

pub mod claims;
pub mod digest;
pub mod results;
pub mod ttl;


// Re-export commonly used types
pub use claims::VerifiedClaims;
pub use digest::{sha256_from_string, validate_sha256, TokenDigest};
pub use results::{BlockResult, CheckResult, FlushResult, ListResult, StatusResult, UnblockResult};
pub use ttl::{format_duration, ttl_display, TtlDecision, INFINITE_TTL_DISPLAY, MAX_TTL_SECONDS};
