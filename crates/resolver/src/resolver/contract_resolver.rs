//! Single-name resolution.

use std::sync::Arc;

use chrono::Utc;
use log::{debug, info, warn};
use tokio::sync::broadcast;
use tokio::time::Instant;

use super::verifier::{ContractVerifier, UnverifiedContracts};
use crate::cache::{CacheStats, ResultCache};
use crate::config::ResolverConfig;
use crate::errors::ResolverError;
use crate::events::{EventBus, NoOpEventSink, ResolverEvent, ResolverEventSink};
use crate::metrics::{MetricsRecorder, MetricsSnapshot};
use crate::models::ResolutionResult;
use crate::provider::{ChainService, IndexService, RpcChainClient, SubgraphClient};
use crate::rate_limiter::RateLimiter;

/// Buffered events per subscriber before the oldest are dropped.
const EVENT_BUS_CAPACITY: usize = 256;

/// Resolves contract names to verified, annotated contract records.
///
/// Composes the index and chain services with a shared rate limiter, a
/// result cache, running metrics and lifecycle events. One instance is meant
/// to be shared by every caller in the process; all methods take `&self`.
pub struct ContractResolver {
    pub(super) config: ResolverConfig,
    index: Arc<dyn IndexService>,
    chain: Arc<dyn ChainService>,
    verifier: Arc<dyn ContractVerifier>,
    cache: ResultCache,
    limiter: RateLimiter,
    metrics: MetricsRecorder,
    bus: EventBus,
    sink: Arc<dyn ResolverEventSink>,
}

impl ContractResolver {
    /// Create a resolver talking to the configured subgraph and node.
    ///
    /// Must be called from within a Tokio runtime: the rate limiter task is
    /// spawned here.
    pub fn new(config: ResolverConfig) -> Result<Self, ResolverError> {
        config.validate()?;
        let index = Arc::new(SubgraphClient::new(&config));
        let chain = Arc::new(RpcChainClient::new(&config));
        Self::with_services(config, index, chain)
    }

    /// Create a resolver over custom service implementations.
    pub fn with_services(
        config: ResolverConfig,
        index: Arc<dyn IndexService>,
        chain: Arc<dyn ChainService>,
    ) -> Result<Self, ResolverError> {
        config.validate()?;

        info!(
            "Contract resolver on '{}' using index '{}' (cache: {}, batch size: {})",
            config.network,
            index.id(),
            config.enable_caching,
            config.batch_size
        );

        Ok(Self {
            cache: ResultCache::new(config.cache_expiry_duration(), config.cache_max_entries),
            limiter: RateLimiter::spawn(&config.rate_limit),
            metrics: MetricsRecorder::new(),
            bus: EventBus::new(EVENT_BUS_CAPACITY),
            sink: Arc::new(NoOpEventSink),
            verifier: Arc::new(UnverifiedContracts),
            config,
            index,
            chain,
        })
    }

    /// Replace the source-verification backend.
    pub fn with_verifier(mut self, verifier: Arc<dyn ContractVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    /// Forward every event to `sink` in addition to the broadcast bus.
    pub fn with_event_sink(mut self, sink: Arc<dyn ResolverEventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a single name.
    ///
    /// Returns `Ok(None)` when the name is unknown to the index, has no
    /// resolver, resolves to no address, or resolves to an account without
    /// bytecode. Upstream failures are counted, reported as a
    /// resolution-error event and returned.
    pub async fn resolve_contract(
        &self,
        name: &str,
    ) -> Result<Option<ResolutionResult>, ResolverError> {
        self.limiter.acquire().await;
        let started = Instant::now();
        self.record(MetricsRecorder::record_request);

        if let Some(cached) = self.fresh_cached(name) {
            debug!("Cache hit for {}", name);
            self.record(MetricsRecorder::record_cache_hit);
            self.emit(ResolverEvent::cache_hit(name));
            return Ok(Some(cached));
        }
        self.record(MetricsRecorder::record_cache_miss);

        match self.resolve_upstream(name).await {
            Ok(Some(result)) => {
                if self.config.enable_caching {
                    self.cache.set(name, result.clone());
                }
                if self.config.enable_metrics {
                    self.metrics.record_resolution(started.elapsed());
                }
                debug!("Resolved {} to {}", name, result.address);
                self.emit(ResolverEvent::resolution_complete(name, result.clone()));
                Ok(Some(result))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                warn!("Failed to resolve {}: {}", name, e);
                self.record(MetricsRecorder::record_error);
                self.emit(ResolverEvent::resolution_error(name, &e));
                Err(e)
            }
        }
    }

    fn fresh_cached(&self, name: &str) -> Option<ResolutionResult> {
        if !self.config.enable_caching {
            return None;
        }

        let entry = self.cache.get(name)?;
        if entry.is_stale(self.config.cache_expiry_duration()) {
            debug!("Cached result for {} is stale ({:?} old)", name, entry.age());
            return None;
        }
        Some(entry.result)
    }

    async fn resolve_upstream(
        &self,
        name: &str,
    ) -> Result<Option<ResolutionResult>, ResolverError> {
        let Some(domain) = self.index.query_domain(name).await? else {
            debug!("No domain record for {}", name);
            return Ok(None);
        };

        let Some(resolver) = domain.resolver_address().map(str::to_string) else {
            debug!("Domain {} has no resolver", name);
            return Ok(None);
        };

        let capabilities = self.chain.resolver_capabilities(&resolver).await;

        let Some(address) = self.chain.resolve_address(name).await? else {
            debug!("Resolver {} has no address for {}", resolver, name);
            return Ok(None);
        };

        if !self.chain.is_contract(&address).await? {
            debug!("{} resolves to {}, which holds no bytecode", name, address);
            return Ok(None);
        }

        let (metadata, verified) = futures::join!(
            self.chain.contract_metadata(&address),
            self.verifier.is_verified(&address)
        );

        let now = Utc::now();
        Ok(Some(ResolutionResult {
            address,
            name: name.to_string(),
            resolver,
            network: self.config.network.clone(),
            verified,
            metadata,
            capabilities,
            resolved_at: now,
            last_verified_at: now,
        }))
    }

    /// Current running metrics.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Drop every cached result.
    pub fn clear_cache(&self) {
        let removed = self.cache.clear();
        info!("Cleared {} cached results", removed);
        self.emit(ResolverEvent::cache_cleared(removed));
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Subscribe to lifecycle events emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<ResolverEvent> {
        self.bus.subscribe()
    }

    fn record(&self, counter: fn(&MetricsRecorder)) {
        if self.config.enable_metrics {
            counter(&self.metrics);
        }
    }

    pub(super) fn emit(&self, event: ResolverEvent) {
        if !self.config.enable_metrics {
            return;
        }
        self.sink.emit(event.clone());
        self.bus.publish(event);
    }
}
