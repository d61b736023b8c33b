//! Test doubles for the upstream services.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::config::{RateLimitConfig, ResolverConfig};
use crate::errors::ResolverError;
use crate::models::{
    ContractMetadata, DomainInfo, MetadataProbes, ResolverCapabilities, ResolverRecord,
};
use crate::provider::{ChainService, IndexService};

pub const RESOLVER: &str = "0x4976fb03C32e5B8cfe2b6cCB31c09Ba78EBaBa41";

/// Config with a permissive rate limit so tests only wait where they mean to.
pub fn fast_config() -> ResolverConfig {
    ResolverConfig {
        rate_limit: RateLimitConfig {
            requests_per_second: 1000.0,
            burst_limit: 100,
        },
        ..ResolverConfig::default()
    }
}

/// Index service answering from a fixed table.
#[derive(Default)]
pub struct MockIndex {
    domains: HashMap<String, DomainInfo>,
    failing: HashSet<String>,
    latency: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    dispatched: Mutex<Vec<(String, Instant)>>,
}

impl MockIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a domain with a resolver attached.
    pub fn with_domain(mut self, name: &str) -> Self {
        self.domains.insert(
            name.to_string(),
            DomainInfo {
                id: format!("node:{}", name),
                name: name.to_string(),
                resolver: Some(ResolverRecord {
                    id: format!("resolver:{}", name),
                    address: RESOLVER.to_string(),
                }),
                resolved_address: None,
            },
        );
        self
    }

    /// Register a domain that has no resolver set.
    pub fn with_bare_domain(mut self, name: &str) -> Self {
        self.domains.insert(
            name.to_string(),
            DomainInfo {
                id: format!("node:{}", name),
                name: name.to_string(),
                resolver: None,
                resolved_address: None,
            },
        );
        self
    }

    /// Queries for `name` fail with a non-retryable index error.
    pub fn failing(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Names in dispatch order, with the instant each query arrived.
    pub fn dispatched(&self) -> Vec<(String, Instant)> {
        self.dispatched.lock().unwrap().clone()
    }
}

#[async_trait]
impl IndexService for MockIndex {
    fn id(&self) -> &'static str {
        "MOCK_INDEX"
    }

    async fn query_domain(&self, name: &str) -> Result<Option<DomainInfo>, ResolverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.dispatched
            .lock()
            .unwrap()
            .push((name.to_string(), Instant::now()));

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(name) {
            return Err(ResolverError::Index {
                message: format!("indexer rejected {}", name),
            });
        }
        Ok(self.domains.get(name).cloned())
    }
}

/// Chain service answering from fixed name → address and bytecode tables.
#[derive(Default)]
pub struct MockChain {
    addresses: HashMap<String, String>,
    contracts: HashSet<String>,
    metadata_calls: AtomicUsize,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// `name` resolves to `address`, which holds bytecode.
    pub fn with_contract(mut self, name: &str, address: &str) -> Self {
        self.addresses.insert(name.to_string(), address.to_string());
        self.contracts.insert(address.to_string());
        self
    }

    /// `name` resolves to `address`, which is an externally owned account.
    pub fn with_account(mut self, name: &str, address: &str) -> Self {
        self.addresses.insert(name.to_string(), address.to_string());
        self
    }

    pub fn metadata_calls(&self) -> usize {
        self.metadata_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainService for MockChain {
    async fn resolve_address(&self, name: &str) -> Result<Option<String>, ResolverError> {
        Ok(self.addresses.get(name).cloned())
    }

    async fn is_contract(&self, address: &str) -> Result<bool, ResolverError> {
        Ok(self.contracts.contains(address))
    }

    async fn resolver_capabilities(&self, _resolver: &str) -> ResolverCapabilities {
        ResolverCapabilities {
            supports_wildcard: true,
            resolver_type: "PublicResolver".to_string(),
            version: "2".to_string(),
        }
    }

    async fn contract_metadata(&self, _address: &str) -> ContractMetadata {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        ContractMetadata::from_probes(MetadataProbes {
            name: Ok("Dai Stablecoin".to_string()),
            symbol: Ok("DAI".to_string()),
            decimals: Ok(18),
            total_supply: Ok("0x3e8".to_string()),
        })
    }
}
