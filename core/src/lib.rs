//! # jwtblock core
//!
//! Token admission and blocklist engine: digest utility, verification
//! pipeline, TTL policy and blocklist operations, plus the repository
//! seams the infrastructure crate implements.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::value_objects::{
    BlockResult, CheckResult, FlushResult, ListResult, StatusResult, TokenDigest, TtlDecision,
    UnblockResult, VerifiedClaims,
};
pub use errors::{CredentialError, DomainError, DomainResult, TokenError};
pub use repositories::{BlocklistStore, EntryTtl, KeyTtl};
pub use services::{
    BlocklistService, KeySetProvider, KeySource, TokenVerifier, TtlPolicy, VerificationConfig,
};

#[cfg(any(test, feature = "mock"))]
pub use repositories::MockBlocklistStore;
