//! Liveness and health endpoints

use actix_web::{web, HttpResponse};

use jb_core::repositories::BlocklistStore;
use jb_shared::types::HealthResponse;

use super::AppState;

/// Service name reported by the health endpoint
pub const SERVICE_NAME: &str = "jwtblock";

/// Handler for GET /
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain; charset=utf-8").body("API index")
}

/// Handler for GET /health
///
/// Healthy when the blocklist cache answers; 503 otherwise.
pub async fn health_check<S>(state: web::Data<AppState<S>>) -> HttpResponse
where
    S: BlocklistStore + 'static,
{
    match state.blocklist.size().await {
        Ok(size) => HttpResponse::Ok().json(HealthResponse::healthy(
            SERVICE_NAME,
            env!("CARGO_PKG_VERSION"),
            size,
        )),
        Err(e) => {
            log::warn!("Health check failed: {}", e);
            HttpResponse::ServiceUnavailable()
                .json(HealthResponse::unhealthy(SERVICE_NAME, env!("CARGO_PKG_VERSION")))
        }
    }
}
