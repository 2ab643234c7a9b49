//! Credential extraction from request headers.
//!
//! Tokens travel as `Authorization: Bearer <token>`; digests in a
//! configurable header. The same parsing serves the HTTP server and the
//! serverless handlers.

use actix_web::{http::header::AUTHORIZATION, HttpRequest};

use jb_core::errors::CredentialError;

/// Authentication scheme expected in the `Authorization` header
pub const BEARER_SCHEME: &str = "bearer";

/// Extract the token from an `Authorization` header value.
///
/// The value must be exactly two space-separated parts with a
/// case-insensitive `Bearer` scheme.
///
/// # Errors
/// * `MissingTokenHeader` - No header value
/// * `MalformedBearerFormat` - Any other shape, including an empty token
pub fn parse_bearer(value: Option<&str>) -> Result<String, CredentialError> {
    let value = value.ok_or(CredentialError::MissingTokenHeader)?;

    let parts: Vec<&str> = value.split(' ').collect();
    match parts.as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case(BEARER_SCHEME) && !token.is_empty() => {
            Ok(token.to_string())
        }
        _ => {
            log::debug!("Malformed bearer token format");
            Err(CredentialError::MalformedBearerFormat)
        }
    }
}

/// Bearer token of an HTTP request
pub fn bearer_from_request(req: &HttpRequest) -> Result<String, CredentialError> {
    let value = req
        .headers()
        .get(AUTHORIZATION)
        .map(|value| value.to_str().map_err(|_| CredentialError::MalformedBearerFormat))
        .transpose()?;
    parse_bearer(value)
}

/// Digest carried in the configured hash header of an HTTP request
pub fn sha256_from_request(req: &HttpRequest, header_name: &str) -> Result<String, CredentialError> {
    req.headers()
        .get(header_name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or(CredentialError::MissingHashHeader)
}
