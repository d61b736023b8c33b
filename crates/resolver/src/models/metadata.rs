use std::collections::BTreeSet;

use log::debug;
use serde::{Deserialize, Serialize};

use super::probe::{fallback, Probe};

/// Audit status of a contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditInfo {
    pub status: String,
    pub firms: Vec<String>,
}

impl Default for AuditInfo {
    fn default() -> Self {
        Self {
            status: fallback::AUDIT_STATUS.to_string(),
            firms: Vec::new(),
        }
    }
}

/// Raw outcomes of the four metadata probes.
#[derive(Debug)]
pub struct MetadataProbes {
    pub name: Probe<String>,
    pub symbol: Probe<String>,
    pub decimals: Probe<u8>,
    /// Hex quantity as returned by `totalSupply()`
    pub total_supply: Probe<String>,
}

/// Contract metadata gathered from on-chain calls.
///
/// Every field is independently defaulted when its probe fails, so a
/// contract exposing none of the optional views still yields a
/// well-formed value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_supply: Option<String>,

    pub description: String,
    pub tags: BTreeSet<String>,
    pub audit: AuditInfo,
}

impl Default for ContractMetadata {
    fn default() -> Self {
        Self {
            name: fallback::CONTRACT_NAME.to_string(),
            symbol: fallback::SYMBOL.to_string(),
            decimals: fallback::DECIMALS,
            total_supply: None,
            description: fallback::DESCRIPTION.to_string(),
            tags: BTreeSet::new(),
            audit: AuditInfo::default(),
        }
    }
}

impl ContractMetadata {
    /// Assemble metadata from probe outcomes, applying the fallback table.
    pub fn from_probes(probes: MetadataProbes) -> Self {
        let mut tags = BTreeSet::new();

        let name = settle(probes.name);
        let symbol = settle(probes.symbol);
        let decimals = settle(probes.decimals);
        let total_supply = settle(probes.total_supply);

        if name.is_some() {
            tags.insert("named".to_string());
        }
        if symbol.is_some() && decimals.is_some() && total_supply.is_some() {
            tags.insert("erc20".to_string());
        }

        let description = match (&name, &symbol) {
            (Some(n), Some(s)) => format!("{} ({})", n, s),
            (Some(n), None) => n.clone(),
            _ => fallback::DESCRIPTION.to_string(),
        };

        Self {
            name: name.unwrap_or_else(|| fallback::CONTRACT_NAME.to_string()),
            symbol: symbol.unwrap_or_else(|| fallback::SYMBOL.to_string()),
            decimals: decimals.unwrap_or(fallback::DECIMALS),
            total_supply,
            description,
            tags,
            audit: AuditInfo::default(),
        }
    }
}

fn settle<T>(probe: Probe<T>) -> Option<T> {
    match probe {
        Ok(value) => Some(value),
        Err(failure) => {
            debug!("{}", failure);
            None
        }
    }
}

/// Resolver contract introspection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolverCapabilities {
    /// Whether the resolver implements the wildcard (ENSIP-10) interface
    pub supports_wildcard: bool,
    pub resolver_type: String,
    pub version: String,
}

impl Default for ResolverCapabilities {
    fn default() -> Self {
        Self {
            supports_wildcard: fallback::SUPPORTS_WILDCARD,
            resolver_type: fallback::RESOLVER_TYPE.to_string(),
            version: fallback::RESOLVER_VERSION.to_string(),
        }
    }
}

impl ResolverCapabilities {
    pub fn from_probes(
        supports_wildcard: Probe<bool>,
        resolver_type: Probe<String>,
        version: Probe<String>,
    ) -> Self {
        Self {
            supports_wildcard: settle(supports_wildcard).unwrap_or(fallback::SUPPORTS_WILDCARD),
            resolver_type: settle(resolver_type)
                .unwrap_or_else(|| fallback::RESOLVER_TYPE.to_string()),
            version: settle(version).unwrap_or_else(|| fallback::RESOLVER_VERSION.to_string()),
        }
    }
}
