//! JSON error responses for the HTTP front end.

use actix_web::{http::StatusCode, HttpResponse};

use jb_core::errors::DomainError;
use jb_shared::errors::{ErrorResponse, IntoErrorResponse};

/// `{"message": ..., "error": true}` with the given status
pub fn error_response(status: StatusCode, message: impl Into<String>) -> HttpResponse {
    let body = ErrorResponse::new(message);
    log::error!("{}", body.message);
    HttpResponse::build(status).json(body)
}

/// Render a domain error.
///
/// Cache failures are always 500; every other error is reported with
/// `client_status`, which depends on the endpoint.
pub fn handle_domain_error(error: &DomainError, client_status: StatusCode) -> HttpResponse {
    let status = if error.is_cache_unavailable() {
        if let DomainError::CacheUnavailable { message } = error {
            log::error!("Blocklist cache error: {}", message);
        }
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        client_status
    };

    let body = error.to_error_response();
    log::error!("{}", body.message);
    HttpResponse::build(status).json(body)
}
