//! Resolver event types.

use serde::{Deserialize, Serialize};

use crate::models::{BatchResolutionResult, ResolutionResult};

/// Canonical event names.
pub const CACHE_HIT: &str = "resolver:cache-hit";
pub const RESOLUTION_COMPLETE: &str = "resolver:resolution-complete";
pub const RESOLUTION_ERROR: &str = "resolver:resolution-error";
pub const BATCH_COMPLETE: &str = "resolver:batch-complete";
pub const CACHE_CLEARED: &str = "resolver:cache-cleared";

/// Events emitted by the resolver.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResolverEvent {
    /// A fresh cached result was served.
    CacheHit { name: String },

    /// A name was resolved from upstream.
    ResolutionComplete {
        name: String,
        result: Box<ResolutionResult>,
    },

    /// A single-name resolution failed.
    ResolutionError { name: String, error: String },

    /// A batch finished; carries the full outcome.
    BatchComplete { outcome: Box<BatchResolutionResult> },

    /// The cache was cleared.
    CacheCleared { entries: usize },
}

impl ResolverEvent {
    pub fn cache_hit(name: impl Into<String>) -> Self {
        Self::CacheHit { name: name.into() }
    }

    pub fn resolution_complete(name: impl Into<String>, result: ResolutionResult) -> Self {
        Self::ResolutionComplete {
            name: name.into(),
            result: Box::new(result),
        }
    }

    pub fn resolution_error(name: impl Into<String>, error: impl ToString) -> Self {
        Self::ResolutionError {
            name: name.into(),
            error: error.to_string(),
        }
    }

    pub fn batch_complete(outcome: BatchResolutionResult) -> Self {
        Self::BatchComplete {
            outcome: Box::new(outcome),
        }
    }

    pub fn cache_cleared(entries: usize) -> Self {
        Self::CacheCleared { entries }
    }

    /// Canonical name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CacheHit { .. } => CACHE_HIT,
            Self::ResolutionComplete { .. } => RESOLUTION_COMPLETE,
            Self::ResolutionError { .. } => RESOLUTION_ERROR,
            Self::BatchComplete { .. } => BATCH_COMPLETE,
            Self::CacheCleared { .. } => CACHE_CLEARED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_type_tag() {
        let event = ResolverEvent::resolution_error("bad.eth", "HTTP 502 from index");
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "resolution_error");
        assert_eq!(json["name"], "bad.eth");
        assert_eq!(json["error"], "HTTP 502 from index");
    }

    #[test]
    fn test_event_names() {
        assert_eq!(ResolverEvent::cache_hit("a.eth").name(), CACHE_HIT);
        assert_eq!(ResolverEvent::cache_cleared(3).name(), CACHE_CLEARED);
        assert_eq!(
            ResolverEvent::batch_complete(BatchResolutionResult::default()).name(),
            BATCH_COMPLETE
        );
    }
}
