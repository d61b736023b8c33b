//! Upstream service trait definitions.

use async_trait::async_trait;

use crate::errors::ResolverError;
use crate::models::{ContractMetadata, DomainInfo, ResolverCapabilities};

/// Indexed-data service answering domain → resolver → address queries.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use contract_resolver::provider::IndexService;
///
/// struct StaticIndex;
///
/// #[async_trait]
/// impl IndexService for StaticIndex {
///     fn id(&self) -> &'static str {
///         "STATIC"
///     }
///
///     async fn query_domain(&self, name: &str) -> Result<Option<DomainInfo>, ResolverError> {
///         Ok(None)
///     }
/// }
/// ```
#[async_trait]
pub trait IndexService: Send + Sync {
    /// Identifier used in logs.
    fn id(&self) -> &'static str;

    /// Look up a domain by name.
    ///
    /// Returns `Ok(None)` when the service has no record of the domain.
    /// Network and protocol failures are returned as errors.
    async fn query_domain(&self, name: &str) -> Result<Option<DomainInfo>, ResolverError>;
}

/// Blockchain read access.
///
/// The two introspection operations never fail: each underlying probe falls
/// back to a placeholder value on its own.
#[async_trait]
pub trait ChainService: Send + Sync {
    /// Resolve a name to an address through the on-chain name registry.
    ///
    /// Returns `Ok(None)` when the name has no resolver or no address record,
    /// or the resolver reverts. Transport failures are returned as errors.
    async fn resolve_address(&self, name: &str) -> Result<Option<String>, ResolverError>;

    /// Returns true iff the address holds non-empty bytecode.
    async fn is_contract(&self, address: &str) -> Result<bool, ResolverError>;

    /// Probe a resolver contract for its capabilities.
    async fn resolver_capabilities(&self, resolver: &str) -> ResolverCapabilities;

    /// Probe a contract for its descriptive metadata.
    async fn contract_metadata(&self, address: &str) -> ContractMetadata;
}
