//! Business services: verification pipeline, TTL policy and blocklist operations.

pub mod blocklist;
pub mod ttl;
pub mod verification;

// Re-export commonly used types
pub use blocklist::BlocklistService;
pub use ttl::TtlPolicy;
pub use verification::{KeySetProvider, KeySource, TokenVerifier, VerificationConfig, VerificationKey};
