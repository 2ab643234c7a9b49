//! CORS policy and middleware.
//!
//! The policy is plain data shared by the HTTP server and the serverless
//! proxy handlers. An origin is allowed when it matches an entry of the
//! allow-list case-insensitively, or when the list holds the `*` wildcard,
//! in which case `*` is echoed back instead of the request origin.
//! Disallowed origins simply get no CORS headers.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{self, HeaderName, HeaderValue},
    Error,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};

use jb_shared::config::HttpConfig;

/// Wildcard entry of the allow-list
pub const WILDCARD_ORIGIN: &str = "*";

/// Headers a cross-origin client may send
pub const ALLOWED_HEADERS: &str = "Authorization,Accept,Origin,Keep-Alive,User-Agent,X-Requested-With,If-Modified-Since,Cache-Control,Content-Type,Content-Range,Range";

/// Methods a cross-origin client may use
pub const ALLOWED_METHODS: &str = "OPTIONS,GET,POST";

/// Origin allow-list and preflight settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsPolicy {
    allowed_origins: Vec<String>,
    max_age_seconds: u64,
}

impl CorsPolicy {
    pub fn new<I, S>(allowed_origins: I, max_age_seconds: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allowed_origins = allowed_origins
            .into_iter()
            .map(Into::into)
            .map(|origin: String| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Self {
            allowed_origins,
            max_age_seconds,
        }
    }

    /// Origin to echo in `Access-Control-Allow-Origin`, if the origin is allowed
    pub fn allowed_origin(&self, origin: &str) -> Option<String> {
        for allowed in &self.allowed_origins {
            if allowed == WILDCARD_ORIGIN {
                return Some(WILDCARD_ORIGIN.to_string());
            }
            if allowed.eq_ignore_ascii_case(origin) {
                return Some(origin.to_string());
            }
        }
        None
    }

    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        self.allowed_origin(origin).is_some()
    }

    /// CORS response headers for a request origin; empty when not allowed
    pub fn response_headers(&self, origin: Option<&str>) -> Vec<(&'static str, String)> {
        let Some(echo) = origin.and_then(|origin| self.allowed_origin(origin)) else {
            log::debug!("CORS headers not added for origin {:?}", origin);
            return Vec::new();
        };

        log::debug!("CORS headers added for origin {}", echo);
        vec![
            ("Access-Control-Allow-Origin", echo),
            ("Access-Control-Allow-Credentials", "true".to_string()),
            ("Access-Control-Allow-Headers", ALLOWED_HEADERS.to_string()),
            ("Access-Control-Allow-Methods", ALLOWED_METHODS.to_string()),
            ("Access-Control-Max-Age", self.max_age_seconds.to_string()),
        ]
    }
}

impl From<&HttpConfig> for CorsPolicy {
    fn from(config: &HttpConfig) -> Self {
        Self::new(config.cors_allowed_origins.iter().cloned(), config.cors_max_seconds)
    }
}

/// Middleware attaching CORS headers to every response for allowed origins
pub struct CorsHeaders {
    policy: Arc<CorsPolicy>,
}

impl CorsHeaders {
    pub fn new(policy: Arc<CorsPolicy>) -> Self {
        Self { policy }
    }
}

impl<S, B> Transform<S, ServiceRequest> for CorsHeaders
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = CorsHeadersService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CorsHeadersService {
            service: Rc::new(service),
            policy: Arc::clone(&self.policy),
        }))
    }
}

pub struct CorsHeadersService<S> {
    service: Rc<S>,
    policy: Arc<CorsPolicy>,
}

impl<S, B> Service<ServiceRequest> for CorsHeadersService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let origin = req
            .headers()
            .get(header::ORIGIN)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let cors_headers = self.policy.response_headers(origin.as_deref());

        Box::pin(async move {
            let mut response = service.call(req).await?;

            let headers = response.headers_mut();
            for (name, value) in cors_headers {
                if let (Ok(name), Ok(value)) =
                    (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(&value))
                {
                    headers.insert(name, value);
                }
            }

            Ok(response)
        })
    }
}
