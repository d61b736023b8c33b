use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::metadata::{ContractMetadata, ResolverCapabilities};

/// A fully resolved and verified contract.
///
/// Immutable once built. Cached copies are returned as-is, so two lookups
/// served from the cache compare equal field for field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionResult {
    /// Contract address the name resolves to
    pub address: String,

    /// Name that was resolved
    pub name: String,

    /// Resolver contract that answered for the name
    pub resolver: String,

    /// Network identifier (e.g., "mainnet")
    pub network: String,

    /// Whether the contract source is verified
    pub verified: bool,

    pub metadata: ContractMetadata,
    pub capabilities: ResolverCapabilities,

    pub resolved_at: DateTime<Utc>,
    pub last_verified_at: DateTime<Utc>,
}
