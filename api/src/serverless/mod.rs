//! Serverless front end.
//!
//! Raw events are classified into one of four shapes and dispatched:
//! authorizer events check the token and answer with an IAM policy, proxy
//! events block the token and answer with an HTTP-shaped response.

pub mod authorizer;
pub mod event;
pub mod proxy;
pub mod runtime;

use std::sync::Arc;

use serde_json::Value;

use jb_core::errors::DomainError;
use jb_core::repositories::BlocklistStore;
use jb_core::services::BlocklistService;

use crate::middleware::cors::CorsPolicy;
use event::{classify_or_reject, ClassifiedEvent};

pub use runtime::{is_lambda_environment, LambdaRuntime, RuntimeError};

/// Routes classified events to the blocklist
pub struct ServerlessHandler<S: BlocklistStore> {
    blocklist: BlocklistService<S>,
    cors: Arc<CorsPolicy>,
}

impl<S: BlocklistStore> ServerlessHandler<S> {
    pub fn new(blocklist: BlocklistService<S>, cors: Arc<CorsPolicy>) -> Self {
        Self { blocklist, cors }
    }

    /// Handle one raw event
    ///
    /// # Errors
    /// * `UnrecognizedEventType` - The event matches none of the known shapes
    pub async fn handle_event(&self, event: Value) -> Result<Value, DomainError> {
        let classified = classify_or_reject(&event).map_err(|e| {
            log::warn!("Unknown Lambda event type");
            e
        })?;
        log::debug!("Lambda event classified as {}", classified.kind());

        let response = match classified {
            ClassifiedEvent::AuthorizerByRequest(event) => {
                to_value(authorizer::handle_request_event(&self.blocklist, &event).await)?
            }
            ClassifiedEvent::AuthorizerByToken(event) => {
                to_value(authorizer::handle_token_event(&self.blocklist, &event).await)?
            }
            ClassifiedEvent::ProxyV1(event) => to_value(
                proxy::handle_proxy_request(&self.blocklist, &self.cors, &event.http_method, &event.headers)
                    .await,
            )?,
            ClassifiedEvent::ProxyV2(event) => to_value(
                proxy::handle_proxy_request(
                    &self.blocklist,
                    &self.cors,
                    &event.request_context.http.method,
                    &event.headers,
                )
                .await,
            )?,
            ClassifiedEvent::Unrecognized => return Err(DomainError::UnrecognizedEventType),
        };

        Ok(response)
    }
}

fn to_value<T: serde::Serialize>(response: T) -> Result<Value, DomainError> {
    serde_json::to_value(response).map_err(|e| DomainError::Internal {
        message: e.to_string(),
    })
}
