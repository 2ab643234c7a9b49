//! Minimal client for the AWS Lambda Runtime API.
//!
//! Polls `/invocation/next`, hands each event to the serverless handler and
//! posts the answer to `/invocation/{id}/response`, or the failure to
//! `/invocation/{id}/error`. Startup failures go to `/init/error`.

use serde_json::{json, Value};
use thiserror::Error;

use jb_core::errors::DomainError;
use jb_core::repositories::BlocklistStore;

use super::ServerlessHandler;

/// Set by the Lambda execution environment
pub const FUNCTION_NAME_ENV: &str = "AWS_LAMBDA_FUNCTION_NAME";

/// Host and port of the Runtime API
pub const RUNTIME_API_ENV: &str = "AWS_LAMBDA_RUNTIME_API";

const RUNTIME_API_VERSION: &str = "2018-06-01";
const REQUEST_ID_HEADER: &str = "lambda-runtime-aws-request-id";

/// Whether the process runs inside AWS Lambda
pub fn is_lambda_environment() -> bool {
    std::env::var_os(FUNCTION_NAME_ENV).is_some()
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("missing {0} environment variable")]
    MissingEndpoint(&'static str),

    #[error("runtime API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("runtime API invocation has no request id")]
    MissingRequestId,
}

pub struct LambdaRuntime {
    client: reqwest::Client,
    base_url: String,
}

impl LambdaRuntime {
    /// Runtime API client for `host:port`
    pub fn new(runtime_api: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: format!("http://{}/{}/runtime", runtime_api, RUNTIME_API_VERSION),
        }
    }

    pub fn from_env() -> Result<Self, RuntimeError> {
        let runtime_api =
            std::env::var(RUNTIME_API_ENV).map_err(|_| RuntimeError::MissingEndpoint(RUNTIME_API_ENV))?;
        Ok(Self::new(&runtime_api))
    }

    /// Serve invocations until the Runtime API fails
    pub async fn run<S: BlocklistStore>(&self, handler: &ServerlessHandler<S>) -> Result<(), RuntimeError> {
        log::info!("Serving Lambda invocations from {}", self.base_url);
        loop {
            self.process_next(handler).await?;
        }
    }

    /// Fetch, handle and answer a single invocation
    ///
    /// Once the request id is known, every failure of the invocation is
    /// posted to its error endpoint. Only Runtime API failures are returned.
    pub async fn process_next<S: BlocklistStore>(
        &self,
        handler: &ServerlessHandler<S>,
    ) -> Result<(), RuntimeError> {
        let response = self
            .client
            .get(format!("{}/invocation/next", self.base_url))
            .send()
            .await?
            .error_for_status()?;

        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or(RuntimeError::MissingRequestId)?;
        log::debug!("Lambda invocation {}", request_id);

        let event = match response.json::<Value>().await {
            Ok(event) => event,
            Err(error) => {
                let payload = failure_payload("InvalidEventPayload", &format!("invalid event payload: {}", error));
                return self.send_error(&request_id, &payload).await;
            }
        };

        match handler.handle_event(event).await {
            Ok(answer) => self.send_response(&request_id, &answer).await,
            Err(error) => self.send_error(&request_id, &error_payload(&error)).await,
        }
    }

    /// Report a failure to start, before any invocation is fetched
    pub async fn report_init_error(&self, message: &str) -> Result<(), RuntimeError> {
        log::error!("Lambda initialization failed: {}", message);
        self.client
            .post(format!("{}/init/error", self.base_url))
            .json(&failure_payload("InitError", message))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn send_response(&self, request_id: &str, response: &Value) -> Result<(), RuntimeError> {
        self.client
            .post(format!("{}/invocation/{}/response", self.base_url, request_id))
            .json(response)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn send_error(&self, request_id: &str, payload: &Value) -> Result<(), RuntimeError> {
        log::error!("Lambda invocation {} failed: {}", request_id, payload["errorMessage"]);
        self.client
            .post(format!("{}/invocation/{}/error", self.base_url, request_id))
            .json(payload)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Error document expected by the Runtime API
pub fn error_payload(error: &DomainError) -> Value {
    let error_type = match error {
        DomainError::UnrecognizedEventType => "UnrecognizedEventType",
        DomainError::CacheUnavailable { .. } => "CacheUnavailable",
        _ => "HandlerError",
    };
    failure_payload(error_type, &error.to_string())
}

fn failure_payload(error_type: &str, message: &str) -> Value {
    json!({ "errorMessage": message, "errorType": error_type })
}
