//! API Gateway authorizer handlers.
//!
//! Both authorizer shapes check the presented token and answer with an IAM
//! policy. A blocked token, a token failing verification, a missing token
//! and a cache failure all produce a `Deny` policy rather than an error.

use serde::Serialize;

use jb_core::domain::value_objects::CheckResult;
use jb_core::errors::CredentialError;
use jb_core::repositories::BlocklistStore;
use jb_core::services::BlocklistService;

use super::event::{header_value, AuthorizerRequestEvent, AuthorizerTokenEvent};
use crate::middleware::auth::parse_bearer;

pub const POLICY_VERSION: &str = "2012-10-17";
pub const INVOKE_ACTION: &str = "execute-api:Invoke";
pub const PRINCIPAL_ID: &str = "user";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Effect {
    Allow,
    Deny,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyStatement {
    #[serde(rename = "Action")]
    pub action: Vec<String>,
    #[serde(rename = "Effect")]
    pub effect: Effect,
    #[serde(rename = "Resource")]
    pub resource: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyDocument {
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Statement")]
    pub statement: Vec<PolicyStatement>,
}

/// Authorizer answer: policy plus the check result as context
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerResponse {
    pub principal_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_document: Option<PolicyDocument>,
    pub context: CheckResult,
}

impl AuthorizerResponse {
    /// Build the policy for a check outcome; no policy document without a resource
    pub fn new(effect: Effect, resource_arn: &str, context: CheckResult) -> Self {
        let policy_document = (!resource_arn.is_empty()).then(|| PolicyDocument {
            version: POLICY_VERSION.to_string(),
            statement: vec![PolicyStatement {
                action: vec![INVOKE_ACTION.to_string()],
                effect,
                resource: vec![resource_arn.to_string()],
            }],
        });

        Self {
            principal_id: PRINCIPAL_ID.to_string(),
            policy_document,
            context,
        }
    }

    pub fn effect(&self) -> Option<Effect> {
        self.policy_document
            .as_ref()
            .and_then(|doc| doc.statement.first())
            .map(|statement| statement.effect)
    }
}

/// Handle an authorizer event carrying request headers
pub async fn handle_request_event<S: BlocklistStore>(
    blocklist: &BlocklistService<S>,
    event: &AuthorizerRequestEvent,
) -> AuthorizerResponse {
    let token = parse_bearer(header_value(&event.headers, "authorization"));
    decide(blocklist, token, event.resource_arn()).await
}

/// Handle an authorizer event carrying only the token
///
/// The token may be given raw or as `Bearer <token>`.
pub async fn handle_token_event<S: BlocklistStore>(
    blocklist: &BlocklistService<S>,
    event: &AuthorizerTokenEvent,
) -> AuthorizerResponse {
    let raw = event.authorization_token.trim();
    let token = if raw.is_empty() {
        Err(CredentialError::MissingTokenHeader)
    } else if raw.contains(' ') {
        parse_bearer(Some(raw))
    } else {
        Ok(raw.to_string())
    };
    decide(blocklist, token, &event.method_arn).await
}

async fn decide<S: BlocklistStore>(
    blocklist: &BlocklistService<S>,
    token: Result<String, CredentialError>,
    resource_arn: &str,
) -> AuthorizerResponse {
    let outcome = match token {
        Ok(token) => blocklist.check_by_jwt(&token).await,
        Err(e) => Err(e.into()),
    };

    let (effect, context) = match outcome {
        Ok(result) if !result.blocked => (Effect::Allow, result),
        Ok(result) => (Effect::Deny, result),
        Err(e) => {
            log::error!("Token check failed: {}", e);
            (Effect::Deny, CheckResult::failed(e.to_string()))
        }
    };

    log::debug!("Authorizer decision {:?} for {}", effect, resource_arn);
    AuthorizerResponse::new(effect, resource_arn, context)
}
