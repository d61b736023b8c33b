//! Typed outcomes for optional on-chain probes.
//!
//! Every metadata or capability probe returns a [`Probe`]. Failures never
//! propagate: the assembling code consults the [`fallback`] table for the
//! field's placeholder instead.

use std::fmt;

/// Outcome of a single optional probe.
pub type Probe<T> = Result<T, ProbeFailure>;

/// Why a probe could not produce a value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeFailure {
    /// Field the probe was populating
    pub field: &'static str,
    pub reason: String,
}

impl ProbeFailure {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} probe failed: {}", self.field, self.reason)
    }
}

/// Placeholder values used when a probe fails.
pub mod fallback {
    pub const CONTRACT_NAME: &str = "Unknown Contract";
    pub const SYMBOL: &str = "UNKNOWN";
    pub const DECIMALS: u8 = 0;
    pub const RESOLVER_TYPE: &str = "Unknown";
    pub const RESOLVER_VERSION: &str = "Unknown";
    pub const SUPPORTS_WILDCARD: bool = false;
    pub const DESCRIPTION: &str = "No description available";
    pub const AUDIT_STATUS: &str = "unaudited";
}
