//! Block record lifetimes and their display form.

/// Display string of the infinite TTL sentinel
pub const INFINITE_TTL_DISPLAY: &str = "Inf";

/// Longest lifetime a block record can be given, well inside what Redis accepts for `EX`
pub const MAX_TTL_SECONDS: i64 = 1_000_000_000_000_000;

/// How the lifetime of a new block record was decided.
///
/// A resolved value of `0` means the record never expires. Negative values
/// are kept as-is: the token has already expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlDecision {
    /// Caller supplied the TTL
    Explicit(i64),
    /// Derived from the token's `exp` claim, plus padding
    FromExpiry { remaining: i64, padding: i64 },
    /// Deployment default
    DeploymentDefault(i64),
}

impl TtlDecision {
    /// Resolved lifetime in seconds, capped at `MAX_TTL_SECONDS`
    pub fn seconds(&self) -> i64 {
        let seconds = match *self {
            TtlDecision::Explicit(seconds) => seconds,
            TtlDecision::FromExpiry { remaining, padding } => remaining.saturating_add(padding),
            TtlDecision::DeploymentDefault(seconds) => seconds,
        };
        seconds.min(MAX_TTL_SECONDS)
    }

    pub fn is_infinite(&self) -> bool {
        self.seconds() == 0
    }

    /// Human readable form, `Inf` for the infinite sentinel
    pub fn display(&self) -> String {
        ttl_display(self.seconds())
    }
}

/// Render a TTL in seconds, mapping `0` to `Inf`.
pub fn ttl_display(seconds: i64) -> String {
    if seconds == 0 {
        INFINITE_TTL_DISPLAY.to_string()
    } else {
        format_duration(seconds)
    }
}

/// Format whole seconds like `2h0m0s`, `1m30s`, `45s` or `-3s`.
pub fn format_duration(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let total = seconds.unsigned_abs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{sign}{hours}h{minutes}m{secs}s")
    } else if minutes > 0 {
        format!("{sign}{minutes}m{secs}s")
    } else {
        format!("{sign}{secs}s")
    }
}
