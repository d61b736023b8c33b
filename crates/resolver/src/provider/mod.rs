//! Upstream service abstractions and implementations.
//!
//! This module contains:
//! - The `IndexService` and `ChainService` traits the resolver depends on
//! - The call policy applying deadlines and bounded retries to every request
//! - `SubgraphClient`, a GraphQL index client
//! - `RpcChainClient`, a JSON-RPC chain client
//!
//! # Architecture
//!
//! The resolver only sees the two traits, so either side can be replaced
//! (a different indexer, an in-process node, test doubles) without touching
//! the orchestration.

mod call;
mod traits;

pub mod rpc;
pub mod subgraph;

pub use call::{with_policy, CallPolicy};
pub use rpc::{HttpRpcTransport, RpcChainClient, RpcTransport};
pub use subgraph::SubgraphClient;
pub use traits::{ChainService, IndexService};

use reqwest::StatusCode;

use crate::errors::ResolverError;

/// Map an HTTP status from `service` to an error. 429 is reported as rate
/// limiting so the call policy backs off; other non-2xx codes keep their status.
pub(crate) fn check_status(
    service: &'static str,
    status: StatusCode,
) -> Result<(), ResolverError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ResolverError::RateLimited { service });
    }
    if !status.is_success() {
        return Err(ResolverError::Http {
            service,
            status: status.as_u16(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_status() {
        assert!(check_status("index", StatusCode::OK).is_ok());

        let err = check_status("index", StatusCode::TOO_MANY_REQUESTS).unwrap_err();
        assert!(matches!(err, ResolverError::RateLimited { service: "index" }));
        assert!(err.retry_class().is_retryable());

        let err = check_status("node", StatusCode::BAD_GATEWAY).unwrap_err();
        assert!(matches!(
            err,
            ResolverError::Http {
                service: "node",
                status: 502
            }
        ));
        assert!(err.retry_class().is_retryable());

        let err = check_status("index", StatusCode::NOT_FOUND).unwrap_err();
        assert!(matches!(err, ResolverError::Http { status: 404, .. }));
        assert!(!err.retry_class().is_retryable());
    }
}
