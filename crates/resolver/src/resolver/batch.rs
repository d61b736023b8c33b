//! Chunked batch resolution.
//!
//! Names are split into consecutive chunks of `batch_size`. Every name in a
//! chunk is resolved concurrently and the whole chunk is awaited before the
//! next one starts, so at most `batch_size` resolutions are in flight. A
//! failing name is recorded in the summary and never affects its neighbours.

use futures::future::join_all;
use log::{debug, info, warn};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::ContractResolver;
use crate::errors::ResolverError;
use crate::events::ResolverEvent;
use crate::models::{BatchEntry, BatchResolutionResult, BatchSummary, PerformanceMetrics};

impl ContractResolver {
    /// Resolve many names, isolating per-name failures.
    ///
    /// `results` holds one entry per name that settled successfully, in input
    /// order; not-found names settle successfully with `result: None`.
    pub async fn resolve_contracts_batch<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> BatchResolutionResult {
        self.resolve_contracts_batch_with_cancel(names, &CancellationToken::new())
            .await
    }

    /// Like [`resolve_contracts_batch`](Self::resolve_contracts_batch), but
    /// stops once `cancel` fires.
    ///
    /// Names that have not settled by then, including every name in chunks
    /// that never started, are recorded as failures with the reason
    /// "resolution cancelled".
    pub async fn resolve_contracts_batch_with_cancel<S: AsRef<str>>(
        &self,
        names: &[S],
        cancel: &CancellationToken,
    ) -> BatchResolutionResult {
        let started = Instant::now();
        let batch_size = self.config.batch_size.max(1);
        let mut summary = BatchSummary::new(names.len());
        let mut results = Vec::with_capacity(names.len());

        info!(
            "Resolving {} names in chunks of {}",
            names.len(),
            batch_size
        );

        for (index, chunk) in names.chunks(batch_size).enumerate() {
            if cancel.is_cancelled() {
                for name in chunk {
                    summary.record_failure(name.as_ref(), ResolverError::Cancelled);
                }
                continue;
            }

            debug!("Batch chunk {} ({} names)", index + 1, chunk.len());

            let outcomes = join_all(chunk.iter().map(|name| async move {
                tokio::select! {
                    biased;
                    outcome = self.resolve_contract(name.as_ref()) => outcome,
                    _ = cancel.cancelled() => Err(ResolverError::Cancelled),
                }
            }))
            .await;

            for (name, outcome) in chunk.iter().zip(outcomes) {
                let name = name.as_ref();
                match outcome {
                    Ok(result) => {
                        summary.record_success();
                        results.push(BatchEntry {
                            name: name.to_string(),
                            result,
                        });
                    }
                    Err(e) => {
                        warn!("Batch: failed to resolve {}: {}", name, e);
                        summary.record_failure(name, e);
                    }
                }
            }
        }

        let performance = PerformanceMetrics::from_elapsed(names.len(), started.elapsed());
        info!(
            "Batch complete: {}/{} resolved in {:.1}ms",
            summary.successful, summary.total, performance.total_time_ms
        );

        let outcome = BatchResolutionResult {
            results,
            summary,
            performance,
        };
        self.emit(ResolverEvent::batch_complete(outcome.clone()));
        outcome
    }
}
