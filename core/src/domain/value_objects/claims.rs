//! Claims decoded by the verification pipeline.

use serde_json::{Map, Value};

/// Claim set of a token that went through the pipeline.
///
/// Empty when parsing is disabled. Lives only for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerifiedClaims {
    claims: Map<String, Value>,
}

impl VerifiedClaims {
    pub fn new(claims: Map<String, Value>) -> Self {
        Self { claims }
    }

    /// Claims of a token that was never parsed
    pub fn empty() -> Self {
        Self::default()
    }

    /// Expiry instant as Unix seconds, if the token carries a numeric `exp` claim
    pub fn expires_at(&self) -> Option<i64> {
        self.claims.get("exp").and_then(numeric_date)
    }

    /// Not-before instant as Unix seconds
    pub fn not_before(&self) -> Option<i64> {
        self.claims.get("nbf").and_then(numeric_date)
    }

    pub fn subject(&self) -> Option<&str> {
        self.claims.get("sub").and_then(Value::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

// NumericDate may be an integer or a float
fn numeric_date(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|seconds| seconds.trunc() as i64))
}

impl From<Map<String, Value>> for VerifiedClaims {
    fn from(claims: Map<String, Value>) -> Self {
        Self::new(claims)
    }
}
