//! Decides how long a block record lives.

use chrono::Utc;
use jb_shared::config::TtlConfig;
use tracing::debug;

use crate::domain::value_objects::{TtlDecision, VerifiedClaims, MAX_TTL_SECONDS};

/// Resolves the TTL of a new block record.
///
/// Precedence, first match wins:
/// 1. an explicit TTL `>= 0` from the caller, used verbatim (`0` never expires)
/// 2. the token's `exp` claim minus now, plus padding, when enabled and present
/// 3. the deployment default
#[derive(Debug, Clone, Copy)]
pub struct TtlPolicy {
    default_seconds: i64,
    padding_seconds: i64,
    use_token_exp: bool,
}

impl TtlPolicy {
    pub fn new(default_seconds: i64, padding_seconds: i64, use_token_exp: bool) -> Self {
        Self {
            default_seconds,
            padding_seconds: padding_seconds.max(0),
            use_token_exp,
        }
    }

    /// Resolve against the current time. A negative `explicit_seconds` means "not specified".
    pub fn resolve(&self, explicit_seconds: i64, claims: &VerifiedClaims) -> TtlDecision {
        self.resolve_at(explicit_seconds, claims, Utc::now().timestamp())
    }

    /// Resolve against a fixed Unix time
    pub fn resolve_at(&self, explicit_seconds: i64, claims: &VerifiedClaims, now: i64) -> TtlDecision {
        if explicit_seconds >= 0 {
            let seconds = explicit_seconds.min(MAX_TTL_SECONDS);
            debug!(ttl = seconds, "Set token TTL from explicit value");
            return TtlDecision::Explicit(seconds);
        }

        if self.use_token_exp {
            match claims.expires_at() {
                Some(expires_at) => {
                    let decision = TtlDecision::FromExpiry {
                        remaining: expires_at.saturating_sub(now),
                        padding: self.padding_seconds,
                    };
                    debug!(
                        padding = self.padding_seconds,
                        total = decision.seconds(),
                        "Set token TTL from exp claim"
                    );
                    return decision;
                }
                None => debug!(
                    ttl = self.default_seconds,
                    "Token has no exp claim, falling back to default TTL"
                ),
            }
        }

        TtlDecision::DeploymentDefault(self.default_seconds)
    }

    pub fn default_seconds(&self) -> i64 {
        self.default_seconds
    }
}

impl From<&TtlConfig> for TtlPolicy {
    fn from(config: &TtlConfig) -> Self {
        Self::new(config.sec_default, config.sec_padding, config.use_token_exp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};

    const NOW: i64 = 1_700_000_000;

    fn claims(value: Value) -> VerifiedClaims {
        match value {
            Value::Object(map) => VerifiedClaims::new(map),
            _ => VerifiedClaims::new(Map::new()),
        }
    }

    #[test]
    fn test_explicit_ttl_wins() {
        let policy = TtlPolicy::new(7200, 5, true);
        let with_exp = claims(json!({ "exp": NOW + 1800 }));

        assert_eq!(policy.resolve_at(60, &with_exp, NOW), TtlDecision::Explicit(60));
        assert_eq!(policy.resolve_at(0, &with_exp, NOW), TtlDecision::Explicit(0));
        assert!(policy.resolve_at(0, &with_exp, NOW).is_infinite());
    }

    #[test]
    fn test_ttl_from_expiry() {
        let with_exp = claims(json!({ "exp": NOW + 1800 }));

        let unpadded = TtlPolicy::new(7200, 0, true);
        assert_eq!(unpadded.resolve_at(-1, &with_exp, NOW).seconds(), 1800);

        let padded = TtlPolicy::new(7200, 85, true);
        assert_eq!(padded.resolve_at(-1, &with_exp, NOW).seconds(), 1885);
    }

    #[test]
    fn test_ttl_from_expiry_against_wall_clock() {
        let policy = TtlPolicy::new(7200, 85, true);
        let with_exp = claims(json!({ "exp": Utc::now().timestamp() + 1800 }));
        let seconds = policy.resolve(-1, &with_exp).seconds();
        assert!((1882..=1885).contains(&seconds), "got {}", seconds);
    }

    #[test]
    fn test_missing_exp_falls_back_to_default() {
        let policy = TtlPolicy::new(7200, 5, true);
        assert_eq!(
            policy.resolve_at(-1, &VerifiedClaims::empty(), NOW),
            TtlDecision::DeploymentDefault(7200)
        );
    }

    #[test]
    fn test_default_when_token_expiry_disabled() {
        let policy = TtlPolicy::new(3600, 5, false);
        let with_exp = claims(json!({ "exp": NOW + 1800 }));
        assert_eq!(
            policy.resolve_at(-1, &with_exp, NOW),
            TtlDecision::DeploymentDefault(3600)
        );
    }

    #[test]
    fn test_expired_token_yields_negative_ttl() {
        let policy = TtlPolicy::new(7200, 0, true);
        let expired = claims(json!({ "exp": NOW - 30 }));
        assert_eq!(policy.resolve_at(-1, &expired, NOW).seconds(), -30);
    }

    #[test]
    fn test_negative_padding_ignored() {
        let policy = TtlPolicy::from(&TtlConfig {
            sec_padding: -10,
            ..TtlConfig::default()
        });
        let with_exp = claims(json!({ "exp": NOW + 100 }));
        assert_eq!(policy.resolve_at(-1, &with_exp, NOW).seconds(), 100);
    }

    #[test]
    fn test_huge_ttls_are_capped() {
        let policy = TtlPolicy::new(7200, i64::MAX, true);
        let far_exp = claims(json!({ "exp": i64::MAX }));

        assert_eq!(
            policy.resolve_at(i64::MAX, &far_exp, NOW),
            TtlDecision::Explicit(MAX_TTL_SECONDS)
        );
        assert_eq!(policy.resolve_at(-1, &far_exp, NOW).seconds(), MAX_TTL_SECONDS);
        assert_eq!(
            TtlPolicy::new(i64::MAX, 0, false).resolve_at(-1, &far_exp, NOW).seconds(),
            MAX_TTL_SECONDS
        );
    }

    #[test]
    fn test_float_exp_claim() {
        let policy = TtlPolicy::new(7200, 0, true);
        let with_exp = claims(json!({ "exp": (NOW + 100) as f64 + 0.5 }));
        assert_eq!(policy.resolve_at(-1, &with_exp, NOW).seconds(), 100);
    }
}
