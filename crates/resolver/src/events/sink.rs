//! Resolver event sink trait and implementations.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::ResolverEvent;

/// Trait for receiving resolver events.
///
/// # Design Rules
///
/// - `emit()` must be fast and non-blocking (no network calls, no disk writes)
/// - Implementations should hand events off for async processing
/// - Failure to emit must not affect resolution (best-effort)
pub trait ResolverEventSink: Send + Sync {
    /// Emit a single event.
    fn emit(&self, event: ResolverEvent);
}

/// No-op implementation for contexts that don't need events.
#[derive(Clone, Default)]
pub struct NoOpEventSink;

impl ResolverEventSink for NoOpEventSink {
    fn emit(&self, _event: ResolverEvent) {}
}

/// Sink that collects emitted events, for tests and inspection.
#[derive(Clone, Default)]
pub struct MockEventSink {
    events: Arc<Mutex<Vec<ResolverEvent>>>,
}

impl MockEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ResolverEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns all collected events.
    pub fn events(&self) -> Vec<ResolverEvent> {
        self.lock().clone()
    }

    /// Returns the canonical names of collected events, in emission order.
    pub fn names(&self) -> Vec<&'static str> {
        self.lock().iter().map(ResolverEvent::name).collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl ResolverEventSink for MockEventSink {
    fn emit(&self, event: ResolverEvent) {
        self.lock().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{CACHE_CLEARED, CACHE_HIT};

    #[test]
    fn test_noop_sink_does_not_panic() {
        let sink = NoOpEventSink;
        sink.emit(ResolverEvent::cache_hit("a.eth"));
    }

    #[test]
    fn test_mock_sink_collects_events() {
        let sink = MockEventSink::new();
        assert!(sink.is_empty());

        sink.emit(ResolverEvent::cache_hit("a.eth"));
        sink.emit(ResolverEvent::cache_cleared(1));

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.names(), vec![CACHE_HIT, CACHE_CLEARED]);

        sink.clear();
        assert!(sink.is_empty());
    }
}
