use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::result::ResolutionResult;

/// Outcome for one name that settled without error.
///
/// `result` is `None` when the name does not resolve to a contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEntry {
    pub name: String,
    pub result: Option<ResolutionResult>,
}

/// Success/failure accounting for a batch.
///
/// Invariant: `total == successful + failed` once the batch has completed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,

    /// "Failed to resolve {name}: {reason}" in input order
    pub errors: Vec<String>,
}

impl BatchSummary {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub fn record_success(&mut self) {
        self.successful += 1;
    }

    pub fn record_failure(&mut self, name: &str, reason: impl std::fmt::Display) {
        self.failed += 1;
        self.errors.push(format!("Failed to resolve {}: {}", name, reason));
    }

    /// Returns true when every requested name has been accounted for.
    pub fn is_complete(&self) -> bool {
        self.successful + self.failed == self.total
    }
}

/// Timing for a whole batch.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub total_time_ms: f64,

    /// Elapsed time divided by the number of requested names,
    /// not the number of successful ones
    pub average_time_per_name_ms: f64,

    /// Names per second
    pub throughput_per_second: f64,
}

impl PerformanceMetrics {
    pub fn from_elapsed(total_names: usize, elapsed: Duration) -> Self {
        let total_time_ms = elapsed.as_secs_f64() * 1000.0;

        let average_time_per_name_ms = if total_names == 0 {
            0.0
        } else {
            total_time_ms / total_names as f64
        };

        let throughput_per_second = if total_time_ms > 0.0 {
            total_names as f64 / total_time_ms * 1000.0
        } else {
            0.0
        };

        Self {
            total_time_ms,
            average_time_per_name_ms,
            throughput_per_second,
        }
    }
}

/// Everything a batch resolution produces.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResolutionResult {
    /// One entry per successfully settled name, in input order
    pub results: Vec<BatchEntry>,
    pub summary: BatchSummary,
    pub performance: PerformanceMetrics,
}
