//! Serverless event classification.
//!
//! An incoming event is first read as a generic JSON envelope. Its
//! discriminating fields pick the shape, and only then is the event decoded
//! strictly into that shape. Checked in order:
//!
//! 1. `type == "request"` (case-insensitive): authorizer by request
//! 2. `type == "token"` (case-insensitive): authorizer by token
//! 3. non-empty `httpMethod`: API Gateway REST proxy (v1)
//! 4. `version == "2.0"`: API Gateway HTTP proxy (v2)

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use jb_core::errors::DomainError;

/// Authorizer event carrying the whole request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerRequestEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub route_arn: String,
    #[serde(default)]
    pub method_arn: String,
    #[serde(default, deserialize_with = "nullable_headers")]
    pub headers: HashMap<String, String>,
}

impl AuthorizerRequestEvent {
    /// Resource the policy applies to
    pub fn resource_arn(&self) -> &str {
        if self.route_arn.is_empty() {
            &self.method_arn
        } else {
            &self.route_arn
        }
    }
}

/// Authorizer event carrying only the token
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerTokenEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub authorization_token: String,
    #[serde(default)]
    pub method_arn: String,
}

/// API Gateway REST proxy request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyV1Event {
    pub http_method: String,
    #[serde(default)]
    pub path: String,
    #[serde(default, deserialize_with = "nullable_headers")]
    pub headers: HashMap<String, String>,
}

/// API Gateway HTTP API proxy request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyV2Event {
    pub version: String,
    #[serde(default)]
    pub raw_path: String,
    #[serde(default, deserialize_with = "nullable_headers")]
    pub headers: HashMap<String, String>,
    pub request_context: ProxyV2RequestContext,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProxyV2RequestContext {
    pub http: ProxyV2Http,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProxyV2Http {
    pub method: String,
}

/// Result of classifying a raw event
#[derive(Debug, Clone)]
pub enum ClassifiedEvent {
    AuthorizerByRequest(AuthorizerRequestEvent),
    AuthorizerByToken(AuthorizerTokenEvent),
    ProxyV1(ProxyV1Event),
    ProxyV2(ProxyV2Event),
    Unrecognized,
}

impl ClassifiedEvent {
    /// Shape name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            ClassifiedEvent::AuthorizerByRequest(_) => "authorizer-request",
            ClassifiedEvent::AuthorizerByToken(_) => "authorizer-token",
            ClassifiedEvent::ProxyV1(_) => "proxy-v1",
            ClassifiedEvent::ProxyV2(_) => "proxy-v2",
            ClassifiedEvent::Unrecognized => "unrecognized",
        }
    }
}

/// Classify a raw event by its discriminating fields
pub fn classify(event: &Value) -> ClassifiedEvent {
    let string_field = |name: &str| event.get(name).and_then(Value::as_str);

    let kind = string_field("type").map(str::to_ascii_lowercase);
    let classified = match kind.as_deref() {
        Some("request") => strict(event).map(ClassifiedEvent::AuthorizerByRequest),
        Some("token") => strict(event).map(ClassifiedEvent::AuthorizerByToken),
        _ if string_field("httpMethod").is_some_and(|method| !method.is_empty()) => {
            strict(event).map(ClassifiedEvent::ProxyV1)
        }
        _ if string_field("version") == Some("2.0") => strict(event).map(ClassifiedEvent::ProxyV2),
        _ => None,
    };

    classified.unwrap_or(ClassifiedEvent::Unrecognized)
}

/// Classify, failing with `UnrecognizedEventType` when no shape matches
pub fn classify_or_reject(event: &Value) -> Result<ClassifiedEvent, DomainError> {
    match classify(event) {
        ClassifiedEvent::Unrecognized => Err(DomainError::UnrecognizedEventType),
        classified => Ok(classified),
    }
}

fn strict<T: DeserializeOwned>(event: &Value) -> Option<T> {
    match T::deserialize(event) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            log::debug!("Event matched a discriminant but failed to decode: {}", e);
            None
        }
    }
}

/// Case-insensitive header lookup
pub fn header_value<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

fn nullable_headers<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<HashMap<String, String>>::deserialize(deserializer)?.unwrap_or_default())
}
