/// Classification for retry policy.
///
/// Used by the call policy to decide whether a failed upstream attempt
/// should be repeated.
///
/// # Behavior Summary
///
/// | Class | Retried? | Surfaces to caller? |
/// |-------|----------|---------------------|
/// | `Never` | No | Immediately |
/// | `WithBackoff` | Yes, up to the configured retry count | After the last attempt |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - malformed reply, configuration error, or cancellation.
    /// Repeating the request would produce the same outcome.
    Never,

    /// Retry with exponential backoff.
    ///
    /// Used for transient errors like rate limiting (429), server errors (5xx),
    /// timeouts and connection failures.
    WithBackoff,
}

impl RetryClass {
    /// Returns true if the error may succeed on a later attempt.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::WithBackoff)
    }
}
