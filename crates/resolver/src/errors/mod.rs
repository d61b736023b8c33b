//! Error types and retry classification for the resolver crate.
//!
//! This module provides:
//! - [`ResolverError`]: The main error enum for all resolution operations
//! - [`RetryClass`]: Classification for determining retry behavior
//!
//! "Not found" outcomes (no domain, no resolver, no address, no bytecode) are
//! not errors; they surface as `Ok(None)` from the resolver.

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Errors that can occur during resolution.
///
/// Each variant is classified into a [`RetryClass`] via the [`retry_class`](Self::retry_class)
/// method, which determines whether the call policy repeats the request.
#[derive(Error, Debug)]
pub enum ResolverError {
    /// The configuration is invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The index service answered with a protocol-level error
    /// (GraphQL `errors` array or a malformed payload).
    #[error("Index service error: {message}")]
    Index {
        /// Description of the failure
        message: String,
    },

    /// The node answered with a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code
        code: i64,
        /// JSON-RPC error message
        message: String,
    },

    /// An upstream service returned a non-success HTTP status.
    #[error("HTTP {status} from {service}")]
    Http {
        /// The upstream service ("index" or "node")
        service: &'static str,
        /// HTTP status code
        status: u16,
    },

    /// An upstream service rate limited the request (HTTP 429).
    #[error("Rate limited: {service}")]
    RateLimited {
        /// The upstream service that rate limited the request
        service: &'static str,
    },

    /// A call did not complete within the configured deadline.
    #[error("Timeout after {timeout_ms}ms: {operation}")]
    Timeout {
        /// The operation that timed out
        operation: String,
        /// The deadline that was exceeded
        timeout_ms: u64,
    },

    /// A reply could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The operation was cancelled by the caller.
    #[error("resolution cancelled")]
    Cancelled,

    /// A network error occurred while communicating with an upstream service.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ResolverError {
    /// Returns the retry classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use contract_resolver::errors::{ResolverError, RetryClass};
    ///
    /// let error = ResolverError::RateLimited { service: "index" };
    /// assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    ///
    /// let error = ResolverError::Decode("bad hex".to_string());
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::RateLimited { .. } | Self::Timeout { .. } => RetryClass::WithBackoff,

            Self::Http { status, .. } if *status >= 500 => RetryClass::WithBackoff,

            Self::Network(e) if e.is_timeout() || e.is_connect() || e.is_request() => {
                RetryClass::WithBackoff
            }

            Self::Config(_)
            | Self::Index { .. }
            | Self::Rpc { .. }
            | Self::Http { .. }
            | Self::Decode(_)
            | Self::Cancelled
            | Self::Network(_) => RetryClass::Never,
        }
    }
}

impl From<serde_json::Error> for ResolverError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}
