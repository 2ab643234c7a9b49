//! API response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall health status
    pub status: HealthStatus,

    /// Service name
    pub service: String,

    /// Server version
    pub version: String,

    /// Number of block records, absent when the cache is unreachable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocklist_size: Option<i64>,

    /// Server timestamp
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    /// Healthy response reporting the current blocklist size
    pub fn healthy(service: impl Into<String>, version: impl Into<String>, size: i64) -> Self {
        Self {
            status: HealthStatus::Healthy,
            service: service.into(),
            version: version.into(),
            blocklist_size: Some(size),
            timestamp: Utc::now(),
        }
    }

    /// Unhealthy response, used when the cache cannot be reached
    pub fn unhealthy(service: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            service: service.into(),
            version: version.into(),
            blocklist_size: None,
            timestamp: Utc::now(),
        }
    }
}

/// Health status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}
