//! Results of blocklist operations, shared by every front end.
//!
//! Field names are part of the public JSON contract.

use serde::{Deserialize, Serialize};

use super::ttl::{ttl_display, TtlDecision};

pub const MSG_TOKEN_BLOCKED: &str = "Token blocked";
pub const MSG_TOKEN_EXISTS: &str = "Token already blocked";
pub const MSG_TOKEN_UNBLOCKED: &str = "Token unblocked";
pub const MSG_TOKEN_NOT_EXISTS: &str = "Token is not blocked";
pub const MSG_TOKEN_ALLOWED: &str = "JWT is allowed";
pub const MSG_TOKEN_IS_BLOCKED: &str = "JWT is blocked";
pub const MSG_FLUSHED: &str = "OK";

/// Outcome of blocking a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockResult {
    pub message: String,
    #[serde(rename = "block_ttl_sec")]
    pub ttl_seconds: i64,
    #[serde(rename = "block_ttl_str")]
    pub ttl_display: String,
    pub is_new: bool,
    pub error: bool,
}

impl BlockResult {
    pub fn new(is_new: bool, ttl: &TtlDecision) -> Self {
        let message = if is_new { MSG_TOKEN_BLOCKED } else { MSG_TOKEN_EXISTS };
        Self {
            message: message.to_string(),
            ttl_seconds: ttl.seconds(),
            ttl_display: ttl.display(),
            is_new,
            error: false,
        }
    }
}

/// Outcome of looking a token up in the blocklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub message: String,
    pub blocked: bool,
    #[serde(rename = "block_ttl_sec")]
    pub ttl_seconds: i64,
    #[serde(rename = "block_ttl_str")]
    pub ttl_display: String,
    pub error: bool,
}

impl CheckResult {
    /// Digest not present in the blocklist
    pub fn allowed() -> Self {
        Self {
            message: MSG_TOKEN_ALLOWED.to_string(),
            blocked: false,
            ttl_seconds: -1,
            ttl_display: String::new(),
            error: false,
        }
    }

    /// Lookup that could not be answered, e.g. a token failing verification
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            blocked: false,
            ttl_seconds: -1,
            ttl_display: String::new(),
            error: true,
        }
    }

    /// Digest present; `ttl_seconds == 0` means it never expires
    pub fn blocked(ttl_seconds: i64) -> Self {
        Self {
            message: MSG_TOKEN_IS_BLOCKED.to_string(),
            blocked: true,
            ttl_seconds,
            ttl_display: ttl_display(ttl_seconds),
            error: false,
        }
    }
}

/// Outcome of removing a token from the blocklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnblockResult {
    pub message: String,
    pub unblocked: bool,
    pub error: bool,
}

impl UnblockResult {
    pub fn new(was_present: bool) -> Self {
        let message = if was_present {
            MSG_TOKEN_UNBLOCKED
        } else {
            MSG_TOKEN_NOT_EXISTS
        };
        Self {
            message: message.to_string(),
            unblocked: was_present,
            error: false,
        }
    }
}

/// Outcome of clearing the blocklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlushResult {
    pub message: String,
    /// Records present right before the clear
    pub count: i64,
    pub error: bool,
}

impl FlushResult {
    pub fn new(count: i64) -> Self {
        Self {
            message: MSG_FLUSHED.to_string(),
            count,
            error: false,
        }
    }
}

/// All digests currently in the blocklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResult {
    pub token_hashes: Vec<String>,
    pub size: i64,
    pub error: bool,
}

impl ListResult {
    pub fn new(token_hashes: Vec<String>) -> Self {
        let size = token_hashes.len() as i64;
        Self {
            token_hashes,
            size,
            error: false,
        }
    }
}

/// Blocklist size report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResult {
    pub size: i64,
}
