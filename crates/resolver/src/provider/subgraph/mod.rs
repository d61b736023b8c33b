//! GraphQL index client.
//!
//! Queries an ENS subgraph for a domain and the resolver attached to it:
//! - `domains(where: { name })` with the resolver id, address and `addr` record
//! - GraphQL `errors` are surfaced as [`ResolverError::Index`]
//! - an empty result list means the index has no record of the name
//!
//! Subgraph schema: https://github.com/ensdomains/ens-subgraph

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::ResolverConfig;
use crate::errors::ResolverError;
use crate::models::{DomainInfo, ResolverRecord};
use crate::provider::call::{with_policy, CallPolicy};
use crate::provider::check_status;
use crate::provider::traits::IndexService;

const SERVICE_ID: &str = "ENS_SUBGRAPH";

const DOMAIN_QUERY: &str = r#"query Domain($name: String!) {
  domains(where: { name: $name }, first: 1) {
    id
    name
    resolvedAddress { id }
    resolver {
      id
      address
      addr { id }
    }
  }
}"#;

// ============================================================================
// API Response Structures
// ============================================================================

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<DomainsData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct DomainsData {
    #[serde(default)]
    domains: Vec<DomainRecord>,
}

/// Entity reference (`{ id }`)
#[derive(Debug, Deserialize)]
struct EntityRef {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DomainRecord {
    id: String,
    /// Null for domains whose labels the subgraph could not recover
    name: Option<String>,
    resolved_address: Option<EntityRef>,
    resolver: Option<ResolverEntity>,
}

#[derive(Debug, Deserialize)]
struct ResolverEntity {
    id: String,
    address: String,
    addr: Option<EntityRef>,
}

impl GraphQlResponse {
    fn into_domain(self, requested: &str) -> Result<Option<DomainInfo>, ResolverError> {
        if !self.errors.is_empty() {
            let message = self
                .errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ResolverError::Index { message });
        }

        let data = self.data.ok_or_else(|| ResolverError::Index {
            message: "response has neither data nor errors".to_string(),
        })?;

        let Some(record) = data.domains.into_iter().next() else {
            return Ok(None);
        };

        let addr_record = record
            .resolver
            .as_ref()
            .and_then(|r| r.addr.as_ref())
            .map(|a| a.id.clone());

        Ok(Some(DomainInfo {
            id: record.id,
            name: record.name.unwrap_or_else(|| requested.to_string()),
            resolver: record.resolver.map(|r| ResolverRecord {
                id: r.id,
                address: r.address,
            }),
            resolved_address: record.resolved_address.map(|a| a.id).or(addr_record),
        }))
    }
}

// ============================================================================
// SubgraphClient
// ============================================================================

/// Index service backed by an ENS subgraph endpoint.
pub struct SubgraphClient {
    client: Client,
    url: String,
    policy: CallPolicy,
}

impl SubgraphClient {
    pub fn new(config: &ResolverConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout_duration())
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            url: config.index_service_url.clone(),
            policy: CallPolicy::from_config(config),
        }
    }

    async fn post_query(&self, name: &str) -> Result<GraphQlResponse, ResolverError> {
        let body = json!({
            "query": DOMAIN_QUERY,
            "variables": { "name": name },
        });

        let response = self.client.post(&self.url).json(&body).send().await?;
        check_status("index", response.status())
            .inspect_err(|e| warn!("Index service rejected query for {}: {}", name, e))?;

        Ok(response.json().await?)
    }
}

#[async_trait]
impl IndexService for SubgraphClient {
    fn id(&self) -> &'static str {
        SERVICE_ID
    }

    async fn query_domain(&self, name: &str) -> Result<Option<DomainInfo>, ResolverError> {
        debug!("Querying index for {}", name);
        let response = with_policy(&self.policy, "index query", || self.post_query(name)).await?;
        response.into_domain(name)
    }
}
