//! Blocklist route handlers

pub mod block;
pub mod check;

type InvalidStatusCode = <actix_web::http::StatusCode as TryFrom<u16>>::Error;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;

use jb_core::repositories::BlocklistStore;
use jb_core::services::BlocklistService;
use jb_shared::config::HttpConfig;

use crate::handlers::error_response;

/// Application state that holds shared services
pub struct AppState<S: BlocklistStore> {
    pub blocklist: BlocklistService<S>,
    /// Check response status when the token is not blocked
    pub status_on_allowed: StatusCode,
    /// Check response status when the token is blocked or unusable
    pub status_on_blocked: StatusCode,
    /// Header carrying a digest on check requests
    pub sha256_header: String,
}

impl<S: BlocklistStore> AppState<S> {
    pub fn new(blocklist: BlocklistService<S>, config: &HttpConfig) -> Result<Self, InvalidStatusCode> {
        Ok(Self {
            blocklist,
            status_on_allowed: StatusCode::from_u16(config.status_on_allowed)?,
            status_on_blocked: StatusCode::from_u16(config.status_on_blocked)?,
            sha256_header: config.http_header_sha256.to_ascii_lowercase(),
        })
    }
}

/// Handler for OPTIONS on blocklist paths
///
/// CORS headers are attached by the `CorsHeaders` middleware when the
/// origin is allowed.
pub async fn preflight() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Fallback for non-POST methods on the block path
pub async fn only_post() -> HttpResponse {
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        "invalid HTTP method. Only POST is allowed",
    )
}

/// Fallback for non-GET methods on the check path
pub async fn only_get() -> HttpResponse {
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        "invalid HTTP method. Only GET is allowed",
    )
}
