use actix_web::{web, HttpRequest, HttpResponse};

use jb_core::repositories::BlocklistStore;

use super::AppState;
use crate::handlers::{error_response, handle_domain_error};
use crate::middleware::auth::{bearer_from_request, sha256_from_request};

/// Handler for GET /blocklist/check
///
/// Looks up the bearer token of the request, or, when there is no usable
/// bearer header, the digest in the configured hash header.
///
/// The status code is `status_on_allowed` for a token that is not blocked
/// and `status_on_blocked` for a blocked token, a token failing
/// verification, or a request without credentials. Cache failures are 500.
///
/// # Response
/// ```json
/// {
///     "message": "JWT is blocked",
///     "blocked": true,
///     "block_ttl_sec": 42,
///     "block_ttl_str": "42s",
///     "error": false
/// }
/// ```
pub async fn check<S>(req: HttpRequest, state: web::Data<AppState<S>>) -> HttpResponse
where
    S: BlocklistStore + 'static,
{
    let result = match bearer_from_request(&req) {
        Ok(token) => {
            log::debug!("Found token in Authorization HTTP header");
            state.blocklist.check_by_jwt(&token).await
        }
        Err(token_err) => match sha256_from_request(&req, &state.sha256_header) {
            Ok(sha256) => {
                log::debug!("Found sha256 hash in {} HTTP header", state.sha256_header);
                state.blocklist.check_by_sha256(&sha256).await
            }
            Err(hash_err) => {
                log::debug!("No credentials: {}; {}", token_err, hash_err);
                return error_response(
                    state.status_on_blocked,
                    "failed to get token or hash from request headers",
                );
            }
        },
    };

    match result {
        Ok(result) => {
            let status = if result.blocked {
                state.status_on_blocked
            } else {
                state.status_on_allowed
            };
            HttpResponse::build(status).json(result)
        }
        Err(error) => handle_domain_error(&error, state.status_on_blocked),
    }
}
