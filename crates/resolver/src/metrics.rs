//! Process-lifetime resolution counters.
//!
//! All counters are monotonically increasing atomics; derived values are
//! computed when a snapshot is taken.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Point-in-time view of the running counters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub errors: u64,
    /// Resolutions that produced a result from upstream
    pub resolutions: u64,
    pub total_latency_ms: f64,

    /// `cache_hits / (cache_hits + cache_misses)`, 0 when nothing was looked up
    pub cache_hit_rate: f64,
    /// `total_latency_ms / resolutions`, 0 when nothing was resolved
    pub average_latency_ms: f64,
}

#[derive(Debug, Default)]
pub struct MetricsRecorder {
    requests: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    errors: AtomicU64,
    resolutions: AtomicU64,
    latency_micros: AtomicU64,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed upstream resolution and its latency.
    pub fn record_resolution(&self, latency: Duration) {
        self.resolutions.fetch_add(1, Ordering::Relaxed);
        let micros = u64::try_from(latency.as_micros()).unwrap_or(u64::MAX);
        self.latency_micros.fetch_add(micros, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let requests = self.requests.load(Ordering::Relaxed);
        let cache_hits = self.cache_hits.load(Ordering::Relaxed);
        let cache_misses = self.cache_misses.load(Ordering::Relaxed);
        let errors = self.errors.load(Ordering::Relaxed);
        let resolutions = self.resolutions.load(Ordering::Relaxed);
        let total_latency_ms = self.latency_micros.load(Ordering::Relaxed) as f64 / 1000.0;

        let lookups = cache_hits + cache_misses;
        let cache_hit_rate = if lookups == 0 {
            0.0
        } else {
            cache_hits as f64 / lookups as f64
        };

        let average_latency_ms = if resolutions == 0 {
            0.0
        } else {
            total_latency_ms / resolutions as f64
        };

        MetricsSnapshot {
            requests,
            cache_hits,
            cache_misses,
            errors,
            resolutions,
            total_latency_ms,
            cache_hit_rate,
            average_latency_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate_is_zero_without_requests() {
        let snapshot = MetricsRecorder::new().snapshot();
        assert_eq!(snapshot.cache_hit_rate, 0.0);
        assert!(!snapshot.cache_hit_rate.is_nan());
        assert_eq!(snapshot.average_latency_ms, 0.0);
    }

    #[test]
    fn test_hit_rate() {
        let metrics = MetricsRecorder::new();
        metrics.record_cache_hit();
        metrics.record_cache_miss();
        metrics.record_cache_miss();
        metrics.record_cache_miss();

        let snapshot = metrics.snapshot();
        assert!((snapshot.cache_hit_rate - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_average_latency() {
        let metrics = MetricsRecorder::new();
        metrics.record_resolution(Duration::from_millis(10));
        metrics.record_resolution(Duration::from_millis(30));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.resolutions, 2);
        assert!((snapshot.total_latency_ms - 40.0).abs() < 1e-9);
        assert!((snapshot.average_latency_ms - 20.0).abs() < 1e-9);
    }
}
