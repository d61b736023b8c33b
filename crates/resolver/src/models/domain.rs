use serde::{Deserialize, Serialize};

/// Resolver reference attached to a domain in the index service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolverRecord {
    /// Index-internal resolver identifier
    pub id: String,

    /// Resolver contract address
    pub address: String,
}

/// Result of an index query for a single domain.
///
/// Transient: only lives for the duration of the resolution that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainInfo {
    /// Index-internal domain identifier (the namehash for ENS)
    pub id: String,

    /// Name as stored by the index service
    pub name: String,

    /// Resolver currently set for the domain, if any
    pub resolver: Option<ResolverRecord>,

    /// Address the index last saw the resolver report for this domain
    pub resolved_address: Option<String>,
}

impl DomainInfo {
    /// Resolver contract address, if the domain has a resolver.
    pub fn resolver_address(&self) -> Option<&str> {
        self.resolver.as_ref().map(|r| r.address.as_str())
    }
}
