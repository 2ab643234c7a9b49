//! API Gateway proxy handlers (REST v1 and HTTP API v2).
//!
//! Both shapes block the bearer token of a POST request and answer with an
//! HTTP-shaped response object.

use std::collections::HashMap;

use serde::Serialize;

use jb_core::repositories::BlocklistStore;
use jb_core::services::BlocklistService;
use jb_shared::errors::{ErrorResponse, IntoErrorResponse};

use super::event::header_value;
use crate::middleware::auth::parse_bearer;
use crate::middleware::cors::CorsPolicy;

/// HTTP-shaped response understood by both proxy integrations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl ProxyResponse {
    fn new(status_code: u16, headers: HashMap<String, String>, body: String) -> Self {
        Self {
            status_code,
            headers,
            body,
            is_base64_encoded: false,
        }
    }

    fn json<T: Serialize>(status_code: u16, headers: HashMap<String, String>, body: &T) -> Self {
        match serde_json::to_string(body) {
            Ok(body) => Self::new(status_code, headers, body),
            Err(e) => {
                log::error!("Error marshaling response to JSON: {}", e);
                Self::new(500, headers, String::from("Error marshaling response to JSON"))
            }
        }
    }
}

/// Block the bearer token of a proxied request
///
/// # Status codes
/// - 200: preflight (`OPTIONS`) or token blocked
/// - 400: token failed verification
/// - 401: missing or malformed bearer header
/// - 405: any method but POST or OPTIONS
/// - 500: blocklist cache unavailable
pub async fn handle_proxy_request<S: BlocklistStore>(
    blocklist: &BlocklistService<S>,
    cors: &CorsPolicy,
    method: &str,
    request_headers: &HashMap<String, String>,
) -> ProxyResponse {
    let origin = header_value(request_headers, "origin");
    let mut headers: HashMap<String, String> = cors
        .response_headers(origin)
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();

    if method.eq_ignore_ascii_case("OPTIONS") {
        log::debug!("Received OPTIONS preflight request");
        return ProxyResponse::new(200, headers, String::new());
    }

    headers.insert("Content-Type".to_string(), "application/json".to_string());

    if !method.eq_ignore_ascii_case("POST") {
        log::warn!("Invalid HTTP method {}", method);
        return ProxyResponse::json(
            405,
            headers,
            &ErrorResponse::new("invalid HTTP method. Only POST is allowed"),
        );
    }

    let token = match parse_bearer(header_value(request_headers, "authorization")) {
        Ok(token) => token,
        Err(e) => {
            log::error!("Failed to get token from request headers: {}", e);
            return ProxyResponse::json(401, headers, &ErrorResponse::new(e.to_string()));
        }
    };

    match blocklist.block(&token, -1).await {
        Ok(result) => ProxyResponse::json(200, headers, &result),
        Err(error) => {
            let status = if error.is_cache_unavailable() { 500 } else { 400 };
            log::error!("Error adding token to blocklist: {}", error);
            ProxyResponse::json(status, headers, &error.to_error_response())
        }
    }
}
