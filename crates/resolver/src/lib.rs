//! Contract Resolver Crate
//!
//! Resolves human-readable contract names (ENS-style, e.g. `dai.eth`) to
//! verified contract records annotated with on-chain metadata.
//!
//! # Overview
//!
//! The resolver crate supports:
//! - Domain → resolver lookups against a GraphQL index service
//! - On-chain verification and metadata probes over JSON-RPC
//! - Request shaping: a shared token-bucket rate limiter and a result cache
//! - Batch resolution with bounded concurrency and per-name failure isolation
//! - Running metrics and lifecycle events
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |   domain name    |  ("dai.eth")
//! +------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! | ContractResolver | <-> |   ResultCache    |  (TTL + LRU bound)
//! +------------------+     +------------------+
//!          |
//!          v
//! +------------------+
//! |   RateLimiter    |  (single-owner actor)
//! +------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! |   IndexService   | --> |   ChainService   |  (subgraph, JSON-RPC node)
//! +------------------+     +------------------+
//!          |
//!          v
//! +------------------+
//! | ResolutionResult |  (address, metadata, capabilities)
//! +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`ContractResolver`] - Entry point for single and batch resolution
//! - [`ResolverConfig`] - Endpoints, deadlines, caching and rate limits
//! - [`ResolutionResult`] - A resolved, verified contract
//! - [`BatchResolutionResult`] - Per-name outcomes, summary and timing
//! - [`ResolverEvent`] - Lifecycle notifications
//! - [`ResolverError`] - Upstream and configuration failures

pub mod cache;
pub mod config;
pub mod errors;
pub mod events;
pub mod metrics;
pub mod models;
pub mod provider;
pub mod rate_limiter;
pub mod resolver;

// Re-export the main entry points
pub use config::{RateLimitConfig, ResolverConfig};
pub use errors::{ResolverError, RetryClass};
pub use resolver::{ContractResolver, ContractVerifier, UnverifiedContracts};

// Re-export model types
pub use models::{
    AuditInfo, BatchEntry, BatchResolutionResult, BatchSummary, ContractMetadata, DomainInfo,
    PerformanceMetrics, ResolutionResult, ResolverCapabilities, ResolverRecord,
};

// Re-export infrastructure types
pub use cache::{CacheEntry, CacheStats, ResultCache};
pub use events::{EventBus, MockEventSink, NoOpEventSink, ResolverEvent, ResolverEventSink};
pub use metrics::{MetricsRecorder, MetricsSnapshot};
pub use provider::{ChainService, IndexService, RpcChainClient, SubgraphClient};
pub use rate_limiter::RateLimiter;

// Re-export the cancellation token accepted by batch resolution
pub use tokio_util::sync::CancellationToken;
