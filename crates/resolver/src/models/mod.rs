//! Resolution models
//!
//! This module contains the core data types for resolution:
//! - `domain` - Index service records (DomainInfo, ResolverRecord)
//! - `probe` - Typed probe outcomes and the per-field fallback table
//! - `metadata` - Contract introspection (ContractMetadata, ResolverCapabilities)
//! - `result` - The externally visible ResolutionResult
//! - `batch` - Batch summaries and performance accounting

mod batch;
mod domain;
mod metadata;
mod probe;
mod result;

pub use batch::{BatchEntry, BatchResolutionResult, BatchSummary, PerformanceMetrics};
pub use domain::{DomainInfo, ResolverRecord};
pub use metadata::{AuditInfo, ContractMetadata, MetadataProbes, ResolverCapabilities};
pub use probe::{fallback, Probe, ProbeFailure};
pub use result::ResolutionResult;
