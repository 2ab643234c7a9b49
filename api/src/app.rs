//! Application factory and HTTP server
//!
//! Builds the Actix-web application around an `AppState` and runs it with
//! the configured bind address and read-header timeout.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{http::Method, middleware::Logger, web, App, HttpResponse, HttpServer};

use jb_core::repositories::BlocklistStore;
use jb_shared::config::HttpConfig;

use crate::middleware::cors::{CorsHeaders, CorsPolicy};
use crate::routes::blocklist::{block::block, check::check, only_get, only_post, preflight, AppState};
use crate::routes::index::{health_check, index};

/// Create and configure the application with all dependencies
pub fn create_app<S>(
    app_state: web::Data<AppState<S>>,
    cors: Arc<CorsPolicy>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    S: BlocklistStore + 'static,
{
    App::new()
        // Add application state
        .app_data(app_state)
        // Middleware order: logging wraps CORS
        .wrap(CorsHeaders::new(cors))
        .wrap(Logger::default())
        .route("/", web::get().to(index))
        .route("/health", web::get().to(health_check::<S>))
        .service(
            web::resource("/blocklist/block")
                .route(web::post().to(block::<S>))
                .route(web::method(Method::OPTIONS).to(preflight))
                .default_service(web::to(only_post)),
        )
        .service(
            web::resource("/blocklist/check")
                .route(web::get().to(check::<S>))
                .route(web::method(Method::OPTIONS).to(preflight))
                .default_service(web::to(only_get)),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Serve the HTTP API until shutdown
pub async fn run_server<S>(app_state: AppState<S>, config: &HttpConfig) -> std::io::Result<()>
where
    S: BlocklistStore + 'static,
{
    let app_state = web::Data::new(app_state);
    let cors = Arc::new(CorsPolicy::from(config));
    let bind_address = config.bind_address();

    log::info!("Serving web API on {}", bind_address);

    HttpServer::new(move || create_app(app_state.clone(), Arc::clone(&cors)))
        .client_request_timeout(Duration::from_secs(config.read_header_timeout))
        .bind(&bind_address)?
        .run()
        .await
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(jb_shared::errors::ErrorResponse::new(
        "The requested resource was not found",
    ))
}
