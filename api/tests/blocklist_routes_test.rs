//! HTTP API tests over a mock blocklist store

mod common;

use std::sync::Arc;

use actix_web::http::{Method, StatusCode};
use actix_web::{test, web};
use serde_json::Value;

use jb_api::app::create_app;
use jb_api::middleware::cors::CorsPolicy;
use jb_api::routes::AppState;
use jb_core::domain::value_objects::sha256_from_string;
use jb_core::MockBlocklistStore;
use jb_shared::config::HttpConfig;

use common::{blocklist, http_config, token_signed_with, valid_token, ALLOWED_ORIGIN};

macro_rules! init_app {
    ($store:expr) => {
        init_app!($store, http_config())
    };
    ($store:expr, $http:expr) => {{
        let http: HttpConfig = $http;
        let state = AppState::new(blocklist(&$store), &http).unwrap();
        test::init_service(create_app(
            web::Data::new(state),
            Arc::new(CorsPolicy::from(&http)),
        ))
        .await
    }};
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

#[actix_web::test]
async fn test_block_new_token() {
    let store = MockBlocklistStore::new();
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/blocklist/block")
        .insert_header(bearer(&valid_token()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Token blocked");
    assert_eq!(body["is_new"], true);
    assert_eq!(body["error"], false);
    // one hour of remaining lifetime plus the default padding
    let ttl = body["block_ttl_sec"].as_i64().unwrap();
    assert!((3600..=3605).contains(&ttl), "unexpected ttl {}", ttl);
}

#[actix_web::test]
async fn test_block_twice_reports_existing() {
    let store = MockBlocklistStore::new();
    let app = init_app!(store);
    let token = valid_token();

    for expected_new in [true, false] {
        let req = test::TestRequest::post()
            .uri("/blocklist/block")
            .insert_header(bearer(&token))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["is_new"], expected_new);
    }

    let req = test::TestRequest::post()
        .uri("/blocklist/block")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Token already blocked");
}

#[actix_web::test]
async fn test_block_without_authorization() {
    let store = MockBlocklistStore::new();
    let app = init_app!(store);

    let req = test::TestRequest::post().uri("/blocklist/block").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "missing HTTP header with token");
    assert_eq!(body["error"], true);
    assert_eq!(store.call_count(), 0);
}

#[actix_web::test]
async fn test_block_malformed_bearer() {
    let store = MockBlocklistStore::new();
    let app = init_app!(store);

    for header in ["Basic abc", "Bearer", "Bearer a b"] {
        let req = test::TestRequest::post()
            .uri("/blocklist/block")
            .insert_header(("Authorization", header))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "header {:?}", header);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "malformed bearer token format");
    }
}

#[actix_web::test]
async fn test_block_rejects_bad_signature() {
    let store = MockBlocklistStore::new();
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/blocklist/block")
        .insert_header(bearer(&token_signed_with("not-the-secret", 3600)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "token signature is invalid");
    assert_eq!(store.call_count(), 0);
}

#[actix_web::test]
async fn test_block_rejects_expired_token() {
    let store = MockBlocklistStore::new();
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/blocklist/block")
        .insert_header(bearer(&token_signed_with(common::SECRET, -600)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "token is expired");
}

#[actix_web::test]
async fn test_block_only_accepts_post() {
    let store = MockBlocklistStore::new();
    let app = init_app!(store);

    for method in [Method::GET, Method::PUT, Method::DELETE] {
        let req = test::TestRequest::default()
            .method(method.clone())
            .uri("/blocklist/block")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED, "method {}", method);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "invalid HTTP method. Only POST is allowed");
    }
}

#[actix_web::test]
async fn test_block_cache_failure_is_server_error() {
    let store = MockBlocklistStore::new();
    store.set_should_fail(true);
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/blocklist/block")
        .insert_header(bearer(&valid_token()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "server cache configuration error");
}

#[actix_web::test]
async fn test_check_allowed_then_blocked() {
    let store = MockBlocklistStore::new();
    let app = init_app!(store);
    let token = valid_token();

    let req = test::TestRequest::get()
        .uri("/blocklist/check")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["blocked"], false);
    assert_eq!(body["message"], "JWT is allowed");

    let req = test::TestRequest::post()
        .uri("/blocklist/block")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/blocklist/check")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["blocked"], true);
    assert_eq!(body["message"], "JWT is blocked");
    assert!(body["block_ttl_sec"].as_i64().unwrap() > 0);
}

#[actix_web::test]
async fn test_check_by_sha256_header() {
    let store = MockBlocklistStore::new();
    let app = init_app!(store);
    let token = valid_token();

    let req = test::TestRequest::post()
        .uri("/blocklist/block")
        .insert_header(bearer(&token))
        .to_request();
    test::call_service(&app, req).await;

    let digest = sha256_from_string(&token).to_uppercase();
    let req = test::TestRequest::get()
        .uri("/blocklist/check")
        .insert_header(("X-JWTBLOCK-SHA256", digest))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["blocked"], true);
}

#[actix_web::test]
async fn test_check_malformed_sha256() {
    let store = MockBlocklistStore::new();
    let app = init_app!(store);

    let req = test::TestRequest::get()
        .uri("/blocklist/check")
        .insert_header(("x-jwtblock-sha256", "not-a-digest"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "malformed sha256");
    assert_eq!(store.call_count(), 0);
}

#[actix_web::test]
async fn test_check_without_credentials() {
    let store = MockBlocklistStore::new();
    let app = init_app!(store);

    let req = test::TestRequest::get().uri("/blocklist/check").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "failed to get token or hash from request headers");
    assert_eq!(body["error"], true);
}

#[actix_web::test]
async fn test_check_custom_status_codes() {
    let store = MockBlocklistStore::new();
    let mut http = http_config();
    http.status_on_allowed = 204;
    http.status_on_blocked = 403;
    let app = init_app!(store, http);
    let token = valid_token();

    let req = test::TestRequest::get()
        .uri("/blocklist/check")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri("/blocklist/check")
        .insert_header(bearer(&token_signed_with("not-the-secret", 3600)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_check_cache_failure_is_server_error() {
    let store = MockBlocklistStore::new();
    store.set_should_fail(true);
    let app = init_app!(store);

    let req = test::TestRequest::get()
        .uri("/blocklist/check")
        .insert_header(bearer(&valid_token()))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[actix_web::test]
async fn test_check_only_accepts_get() {
    let store = MockBlocklistStore::new();
    let app = init_app!(store);

    let req = test::TestRequest::post().uri("/blocklist/check").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "invalid HTTP method. Only GET is allowed");
}

#[actix_web::test]
async fn test_preflight_from_allowed_origin() {
    let store = MockBlocklistStore::new();
    let app = init_app!(store);

    let req = test::TestRequest::default()
        .method(Method::OPTIONS)
        .uri("/blocklist/block")
        .insert_header(("Origin", ALLOWED_ORIGIN))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let headers = resp.headers();
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        ALLOWED_ORIGIN
    );
    assert_eq!(headers.get("access-control-allow-credentials").unwrap(), "true");
    assert_eq!(
        headers.get("access-control-allow-methods").unwrap(),
        "OPTIONS,GET,POST"
    );
    assert_eq!(headers.get("access-control-max-age").unwrap(), "86400");
}

#[actix_web::test]
async fn test_preflight_from_unknown_origin() {
    let store = MockBlocklistStore::new();
    let app = init_app!(store);

    let req = test::TestRequest::default()
        .method(Method::OPTIONS)
        .uri("/blocklist/check")
        .insert_header(("Origin", "https://evil.example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(resp.headers().get("access-control-allow-origin").is_none());
}

#[actix_web::test]
async fn test_cors_headers_on_regular_responses() {
    let store = MockBlocklistStore::new();
    let app = init_app!(store, HttpConfig::default().with_cors_origins(["*"]));

    let req = test::TestRequest::post()
        .uri("/blocklist/block")
        .insert_header(("Origin", "https://anywhere.example"))
        .insert_header(bearer(&valid_token()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("access-control-allow-origin").unwrap(), "*");
}

#[actix_web::test]
async fn test_index() {
    let store = MockBlocklistStore::new();
    let app = init_app!(store);

    let req = test::TestRequest::get().uri("/").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body, "API index");
}

#[actix_web::test]
async fn test_health_reports_blocklist_size() {
    let store = MockBlocklistStore::new();
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/blocklist/block")
        .insert_header(bearer(&valid_token()))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "jwtblock");
    assert_eq!(body["blocklist_size"], 1);
}

#[actix_web::test]
async fn test_health_without_cache() {
    let store = MockBlocklistStore::new();
    store.set_should_fail(true);
    let app = init_app!(store);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "unhealthy");
}

#[actix_web::test]
async fn test_unknown_path() {
    let store = MockBlocklistStore::new();
    let app = init_app!(store);

    let req = test::TestRequest::get().uri("/blocklist/unknown").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], true);
}
