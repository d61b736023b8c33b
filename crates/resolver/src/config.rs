//! Resolver configuration.
//!
//! Configuration can be deserialized from JSON (camelCase keys) or loaded from
//! `RESOLVER_*` environment variables, with a `.env` file honored when present.

use std::str::FromStr;
use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::errors::ResolverError;

/// Default ENS subgraph endpoint.
pub const DEFAULT_INDEX_SERVICE_URL: &str =
    "https://api.thegraph.com/subgraphs/name/ensdomains/ens";

/// Default public JSON-RPC endpoint.
pub const DEFAULT_NODE_URL: &str = "https://eth.llamarpc.com";

/// ENS registry contract on Ethereum mainnet.
pub const DEFAULT_ENS_REGISTRY: &str = "0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e";

/// Outbound request shaping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RateLimitConfig {
    /// Token refill rate. With a burst limit of 1 this is exactly the
    /// minimum spacing `1000 / requests_per_second` milliseconds.
    pub requests_per_second: f64,
    /// Token bucket capacity.
    pub burst_limit: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 10.0,
            burst_limit: 1,
        }
    }
}

/// Configuration for [`ContractResolver`](crate::ContractResolver).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolverConfig {
    /// GraphQL endpoint for domain/resolver queries.
    pub index_service_url: String,
    /// JSON-RPC endpoint for chain reads.
    pub node_url: String,
    /// Per-attempt deadline for every network call, in milliseconds.
    pub timeout: u64,
    /// Retries for retryable upstream failures.
    pub retries: u32,
    pub enable_caching: bool,
    /// Cache staleness threshold, in seconds.
    pub cache_expiry: u64,
    /// Upper bound on cached entries; least recently used entries are evicted.
    pub cache_max_entries: usize,
    /// Chunk size and concurrency width for batch resolution.
    pub batch_size: usize,
    pub enable_metrics: bool,
    pub rate_limit: RateLimitConfig,
    /// Network identifier stamped on every result.
    pub network: String,
    /// ENS registry contract address.
    pub ens_registry: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            index_service_url: DEFAULT_INDEX_SERVICE_URL.to_string(),
            node_url: DEFAULT_NODE_URL.to_string(),
            timeout: 30_000,
            retries: 3,
            enable_caching: true,
            cache_expiry: 3600,
            cache_max_entries: 10_000,
            batch_size: 10,
            enable_metrics: true,
            rate_limit: RateLimitConfig::default(),
            network: "mainnet".to_string(),
            ens_registry: DEFAULT_ENS_REGISTRY.to_string(),
        }
    }
}

impl ResolverConfig {
    /// Load configuration from the environment, falling back to defaults for
    /// anything unset. Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        Self {
            index_service_url: std::env::var("RESOLVER_INDEX_SERVICE_URL")
                .unwrap_or(defaults.index_service_url),
            node_url: std::env::var("RESOLVER_NODE_URL").unwrap_or(defaults.node_url),
            timeout: env_parse("RESOLVER_TIMEOUT_MS", defaults.timeout),
            retries: env_parse("RESOLVER_RETRIES", defaults.retries),
            enable_caching: env_parse("RESOLVER_ENABLE_CACHING", defaults.enable_caching),
            cache_expiry: env_parse("RESOLVER_CACHE_EXPIRY_SECS", defaults.cache_expiry),
            cache_max_entries: env_parse(
                "RESOLVER_CACHE_MAX_ENTRIES",
                defaults.cache_max_entries,
            ),
            batch_size: env_parse("RESOLVER_BATCH_SIZE", defaults.batch_size),
            enable_metrics: env_parse("RESOLVER_ENABLE_METRICS", defaults.enable_metrics),
            rate_limit: RateLimitConfig {
                requests_per_second: env_parse(
                    "RESOLVER_REQUESTS_PER_SECOND",
                    defaults.rate_limit.requests_per_second,
                ),
                burst_limit: env_parse("RESOLVER_BURST_LIMIT", defaults.rate_limit.burst_limit),
            },
            network: std::env::var("RESOLVER_NETWORK").unwrap_or(defaults.network),
            ens_registry: std::env::var("RESOLVER_ENS_REGISTRY").unwrap_or(defaults.ens_registry),
        }
    }

    /// Reject configurations the resolver cannot run with.
    pub fn validate(&self) -> Result<(), ResolverError> {
        if self.index_service_url.trim().is_empty() {
            return Err(ResolverError::Config("indexServiceUrl is empty".into()));
        }
        if self.node_url.trim().is_empty() {
            return Err(ResolverError::Config("nodeUrl is empty".into()));
        }
        if self.batch_size == 0 {
            return Err(ResolverError::Config("batchSize must be at least 1".into()));
        }
        let rps = self.rate_limit.requests_per_second;
        if !rps.is_finite() || rps <= 0.0 {
            return Err(ResolverError::Config(
                "rateLimit.requestsPerSecond must be a positive number".into(),
            ));
        }
        if self.rate_limit.burst_limit == 0 {
            return Err(ResolverError::Config(
                "rateLimit.burstLimit must be at least 1".into(),
            ));
        }
        if self.cache_max_entries == 0 {
            return Err(ResolverError::Config(
                "cacheMaxEntries must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }

    pub fn cache_expiry_duration(&self) -> Duration {
        Duration::from_secs(self.cache_expiry)
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring unparseable value for {}: '{}'", key, raw);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ResolverConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.rate_limit.burst_limit, 1);
        assert_eq!(config.timeout_duration(), Duration::from_secs(30));
    }

    #[test]
    fn test_deserialize_camel_case_with_defaults() {
        let config: ResolverConfig = serde_json::from_str(
            r#"{
                "nodeUrl": "http://localhost:8545",
                "cacheExpiry": 60,
                "batchSize": 2,
                "rateLimit": { "requestsPerSecond": 5 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.node_url, "http://localhost:8545");
        assert_eq!(config.cache_expiry_duration(), Duration::from_secs(60));
        assert_eq!(config.batch_size, 2);
        assert_eq!(config.rate_limit.requests_per_second, 5.0);
        assert_eq!(config.rate_limit.burst_limit, 1);
        assert_eq!(config.index_service_url, DEFAULT_INDEX_SERVICE_URL);
        assert!(config.enable_caching);
    }

    #[test]
    fn test_validate_rejects_zero_batch_size() {
        let config = ResolverConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ResolverError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_rate_limit() {
        let mut config = ResolverConfig::default();
        config.rate_limit.requests_per_second = 0.0;
        assert!(config.validate().is_err());

        config.rate_limit.requests_per_second = f64::NAN;
        assert!(config.validate().is_err());

        config.rate_limit.requests_per_second = 10.0;
        config.rate_limit.burst_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_urls() {
        let config = ResolverConfig {
            node_url: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
