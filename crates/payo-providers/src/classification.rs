//! Failure classification and cooldown policy
//!
//! A provider that ran out of credit will not recover in a minute, so quota
//! and billing failures sit out much longer than transient ones.

use std::time::Duration;

use crate::error::ProviderError;

/// Cooldown applied after a quota/balance failure
pub const QUOTA_COOLDOWN: Duration = Duration::from_millis(3_600_000);

/// Cooldown applied after any other failure
pub const TRANSIENT_COOLDOWN: Duration = Duration::from_millis(60_000);

/// Cooldown applied when none is specified
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(300_000);

const QUOTA_MARKERS: &[&str] = &["insufficient", "quota", "balance", "billing", "limit exceeded"];
const QUOTA_STATUSES: &[u16] = &[429, 402];
const QUOTA_CODE: &str = "insufficient_quota";

/// Kind of provider failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Usage allowance or balance exhausted
    Quota,
    /// Anything else
    Transient,
}

impl FailureKind {
    /// Default cooldown for this kind of failure
    pub fn cooldown(&self) -> Duration {
        match self {
            FailureKind::Quota => QUOTA_COOLDOWN,
            FailureKind::Transient => TRANSIENT_COOLDOWN,
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Quota => write!(f, "quota"),
            FailureKind::Transient => write!(f, "transient"),
        }
    }
}

/// Classify a failure from its message and carried status or code
pub fn classify_parts(message: &str, status: Option<u16>, code: Option<&str>) -> FailureKind {
    let lowered = message.to_lowercase();
    let quota_message = QUOTA_MARKERS.iter().any(|marker| lowered.contains(marker));
    let quota_status = status.map_or(false, |s| QUOTA_STATUSES.contains(&s));
    let quota_code = code.map_or(false, |c| c == QUOTA_CODE);

    if quota_message || quota_status || quota_code {
        FailureKind::Quota
    } else {
        FailureKind::Transient
    }
}

/// Classify a provider error
pub fn classify(error: &ProviderError) -> FailureKind {
    classify_parts(&error.to_string(), error.status_code(), error.error_code())
}

/// Cooldown durations used by the failover loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownPolicy {
    pub quota: Duration,
    pub transient: Duration,
}

impl Default for CooldownPolicy {
    fn default() -> Self {
        Self {
            quota: QUOTA_COOLDOWN,
            transient: TRANSIENT_COOLDOWN,
        }
    }
}

impl CooldownPolicy {
    /// Cooldown for a failure of `kind`
    pub fn cooldown_for(&self, kind: FailureKind) -> Duration {
        match kind {
            FailureKind::Quota => self.quota,
            FailureKind::Transient => self.transient,
        }
    }
}
