//! Deadline and retry policy for upstream calls.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::ResolverConfig;
use crate::errors::ResolverError;

const DEFAULT_BASE_BACKOFF: Duration = Duration::from_millis(200);
const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(5);

/// Per-call deadline plus bounded exponential backoff.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallPolicy {
    /// Deadline for a single attempt.
    pub timeout: Duration,
    /// Additional attempts after the first one, for retryable errors only.
    pub retries: u32,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for CallPolicy {
    fn default() -> Self {
        Self::from_config(&ResolverConfig::default())
    }
}

impl CallPolicy {
    pub fn from_config(config: &ResolverConfig) -> Self {
        Self {
            timeout: config.timeout_duration(),
            retries: config.retries,
            base_backoff: DEFAULT_BASE_BACKOFF,
            max_backoff: DEFAULT_MAX_BACKOFF,
        }
    }

    /// Delay before retry number `attempt` (zero-based): base × 2^attempt, capped.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_backoff.saturating_mul(factor).min(self.max_backoff)
    }
}

/// Run `call` under `policy`.
///
/// Every attempt is bounded by the policy timeout. Errors classified as
/// retryable are retried up to `policy.retries` times with exponential
/// backoff; anything else is returned immediately.
pub async fn with_policy<T, F, Fut>(
    policy: &CallPolicy,
    operation: &str,
    mut call: F,
) -> Result<T, ResolverError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ResolverError>>,
{
    let mut attempt = 0u32;

    loop {
        let outcome = match tokio::time::timeout(policy.timeout, call()).await {
            Ok(outcome) => outcome,
            Err(_) => Err(ResolverError::Timeout {
                operation: operation.to_string(),
                timeout_ms: u64::try_from(policy.timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        };

        match outcome {
            Ok(value) => {
                if attempt > 0 {
                    debug!("{} succeeded after {} retries", operation, attempt);
                }
                return Ok(value);
            }
            Err(e) if attempt < policy.retries && e.retry_class().is_retryable() => {
                let delay = policy.backoff_for(attempt);
                warn!(
                    "{} failed ({}), retry {}/{} in {:?}",
                    operation,
                    e,
                    attempt + 1,
                    policy.retries,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn policy(retries: u32) -> CallPolicy {
        CallPolicy {
            timeout: Duration::from_millis(500),
            retries,
            base_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(250),
        }
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = policy(5);
        assert_eq!(policy.backoff_for(0), Duration::from_millis(100));
        assert_eq!(policy.backoff_for(1), Duration::from_millis(200));
        assert_eq!(policy.backoff_for(2), Duration::from_millis(250));
        assert_eq!(policy.backoff_for(40), Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_transient_errors_then_succeeds() {
        let calls = AtomicU32::new(0);

        let result = with_policy(&policy(3), "query", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(ResolverError::RateLimited { service: "index" })
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_configured_retries() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = with_policy(&policy(2), "query", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(ResolverError::Http {
                    service: "index",
                    status: 503,
                })
            }
        })
        .await;

        assert!(matches!(result, Err(ResolverError::Http { status: 503, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_errors_return_immediately() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = with_policy(&policy(3), "query", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(ResolverError::Index {
                    message: "bad query".to_string(),
                })
            }
        })
        .await;

        assert!(matches!(result, Err(ResolverError::Index { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_call_times_out() {
        let result: Result<(), _> = with_policy(&policy(0), "eth_call", || async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(())
        })
        .await;

        match result {
            Err(ResolverError::Timeout {
                operation,
                timeout_ms,
            }) => {
                assert_eq!(operation, "eth_call");
                assert_eq!(timeout_ms, 500);
            }
            other => panic!("expected timeout, got {:?}", other),
        }
    }
}
