use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};

use jb_core::repositories::BlocklistStore;

use super::AppState;
use crate::handlers::{error_response, handle_domain_error};
use crate::middleware::auth::bearer_from_request;

/// Handler for POST /blocklist/block
///
/// Blocks the bearer token of the request until its TTL elapses.
///
/// # Headers
///
/// ```text
/// Authorization: Bearer {token}
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "message": "Token blocked",
///     "block_ttl_sec": 3605,
///     "block_ttl_str": "1h0m5s",
///     "is_new": true,
///     "error": false
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Token failed verification
/// - 401 Unauthorized: Missing or malformed bearer header
/// - 405 Method Not Allowed: Any method but POST or OPTIONS
/// - 500 Internal Server Error: Blocklist cache unavailable
pub async fn block<S>(req: HttpRequest, state: web::Data<AppState<S>>) -> HttpResponse
where
    S: BlocklistStore + 'static,
{
    let token = match bearer_from_request(&req) {
        Ok(token) => token,
        Err(e) => return error_response(StatusCode::UNAUTHORIZED, e.to_string()),
    };

    match state.blocklist.block(&token, -1).await {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(error) => handle_domain_error(&error, StatusCode::BAD_REQUEST),
    }
}
