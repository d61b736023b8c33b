//! JSON-RPC chain client.
//!
//! Name resolution goes through the ENS registry (`resolver(bytes32)`) and then
//! the resolver itself (`addr(bytes32)`). Capability and metadata probes are
//! plain `eth_call`s issued concurrently; each one settles independently.

pub mod abi;
mod transport;

pub use transport::{HttpRpcTransport, RpcTransport};

use std::sync::Arc;

use alloy::primitives::{hex, Address, Bytes, FixedBytes, B256, U256};
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::ResolverConfig;
use crate::errors::ResolverError;
use crate::models::{ContractMetadata, MetadataProbes, Probe, ProbeFailure, ResolverCapabilities};
use crate::provider::call::{with_policy, CallPolicy};
use crate::provider::traits::ChainService;

type Decoder<T> = fn(&[u8]) -> Result<T, ResolverError>;

/// Decode the return value of call `C`.
fn decode<C: SolCall>(reply: &[u8]) -> Result<C::Return, ResolverError> {
    C::abi_decode_returns(reply)
        .map_err(|e| ResolverError::Decode(format!("{} decode failed: {}", C::SIGNATURE, e)))
}

/// Decode a returned address. The zero address means "unset".
fn decode_address<C: SolCall<Return = Address>>(
    reply: &[u8],
) -> Result<Option<String>, ResolverError> {
    let address = decode::<C>(reply)?;
    if address.is_zero() {
        Ok(None)
    } else {
        Ok(Some(address.to_checksum(None)))
    }
}

/// Decode a `string` return, falling back to the right-padded `bytes32`
/// some older tokens return instead.
fn decode_text<C, L>(reply: &[u8]) -> Result<String, ResolverError>
where
    C: SolCall<Return = String>,
    L: SolCall<Return = B256>,
{
    decode::<C>(reply).or_else(|err| {
        let word = decode::<L>(reply).map_err(|_| err)?;
        let end = word.iter().position(|b| *b == 0).unwrap_or(word.len());
        match std::str::from_utf8(&word[..end]) {
            Ok(text) if !text.is_empty() => Ok(text.to_string()),
            _ => Err(ResolverError::Decode(format!(
                "{} returned no text",
                L::SIGNATURE
            ))),
        }
    })
}

/// Decode a `string` return, falling back to a `uint256` rendered in decimal.
fn decode_text_or_number<C, L>(reply: &[u8]) -> Result<String, ResolverError>
where
    C: SolCall<Return = String>,
    L: SolCall<Return = U256>,
{
    decode::<C>(reply).or_else(|err| {
        decode::<L>(reply)
            .map(|value| value.to_string())
            .map_err(|_| err)
    })
}

/// Decode `totalSupply()` as a minimal hex quantity (`0x0` for zero).
fn decode_quantity(reply: &[u8]) -> Result<String, ResolverError> {
    decode::<abi::totalSupplyCall>(reply).map(|supply| format!("0x{:x}", supply))
}

/// Chain client issuing `eth_call` / `eth_getCode` over a [`RpcTransport`].
pub struct RpcChainClient {
    transport: Arc<dyn RpcTransport>,
    policy: CallPolicy,
    registry: String,
}

impl RpcChainClient {
    /// Build an HTTP-backed client from the resolver configuration.
    pub fn new(config: &ResolverConfig) -> Self {
        let transport = HttpRpcTransport::new(config.node_url.clone(), config.timeout_duration());
        Self::with_transport(
            Arc::new(transport),
            CallPolicy::from_config(config),
            config.ens_registry.clone(),
        )
    }

    pub fn with_transport(
        transport: Arc<dyn RpcTransport>,
        policy: CallPolicy,
        registry: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            policy,
            registry: registry.into(),
        }
    }

    async fn request(&self, method: &'static str, params: Value) -> Result<Value, ResolverError> {
        with_policy(&self.policy, method, || {
            self.transport.request(method, params.clone())
        })
        .await
    }

    async fn request_bytes(
        &self,
        method: &'static str,
        params: Value,
    ) -> Result<Bytes, ResolverError> {
        let reply = self.request(method, params).await?;
        let data = reply
            .as_str()
            .ok_or_else(|| ResolverError::Decode(format!("{} result is not a string", method)))?;
        data.parse::<Bytes>()
            .map_err(|e| ResolverError::Decode(format!("{} result is not hex: {}", method, e)))
    }

    async fn call_view<C: SolCall>(&self, to: &str, call: &C) -> Result<Bytes, ResolverError> {
        let data = hex::encode_prefixed(call.abi_encode());
        self.request_bytes("eth_call", json!([{ "to": to, "data": data }, "latest"]))
            .await
    }

    async fn probe<C: SolCall, T>(
        &self,
        to: &str,
        field: &'static str,
        call: C,
        decode: Decoder<T>,
    ) -> Probe<T> {
        self.call_view(to, &call)
            .await
            .and_then(|reply| decode(&reply))
            .map_err(|e| ProbeFailure::new(field, e.to_string()))
    }

    async fn lookup_address(&self, name: &str) -> Result<Option<String>, ResolverError> {
        let node = abi::namehash(name);

        let reply = self
            .call_view(&self.registry, &abi::resolverCall { node })
            .await?;
        let Some(resolver) = decode_address::<abi::resolverCall>(&reply)? else {
            debug!("No resolver registered for {}", name);
            return Ok(None);
        };

        let reply = self.call_view(&resolver, &abi::addrCall { node }).await?;
        decode_address::<abi::addrCall>(&reply)
    }
}

#[async_trait]
impl ChainService for RpcChainClient {
    async fn resolve_address(&self, name: &str) -> Result<Option<String>, ResolverError> {
        match self.lookup_address(name).await {
            Ok(address) => Ok(address),
            Err(e @ (ResolverError::Rpc { .. } | ResolverError::Decode(_))) => {
                debug!("Resolution of {} yielded no address: {}", name, e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn is_contract(&self, address: &str) -> Result<bool, ResolverError> {
        let code = self
            .request_bytes("eth_getCode", json!([address, "latest"]))
            .await?;
        Ok(!code.is_empty())
    }

    async fn resolver_capabilities(&self, resolver: &str) -> ResolverCapabilities {
        // ENSIP-10 wildcard resolvers advertise the `resolve(bytes,bytes)` selector.
        let wildcard = abi::supportsInterfaceCall {
            interfaceId: FixedBytes::from(abi::resolveCall::SELECTOR),
        };

        let (supports_wildcard, resolver_type, version) = futures::join!(
            self.probe(
                resolver,
                "supportsWildcard",
                wildcard,
                decode::<abi::supportsInterfaceCall>,
            ),
            self.probe(
                resolver,
                "resolverType",
                abi::resolverTypeCall {},
                decode_text_or_number::<abi::resolverTypeCall, abi::legacy::resolverTypeCall>,
            ),
            self.probe(
                resolver,
                "version",
                abi::versionCall {},
                decode_text_or_number::<abi::versionCall, abi::legacy::versionCall>,
            ),
        );

        ResolverCapabilities::from_probes(supports_wildcard, resolver_type, version)
    }

    async fn contract_metadata(&self, address: &str) -> ContractMetadata {
        let (name, symbol, decimals, total_supply) = futures::join!(
            self.probe(
                address,
                "name",
                abi::nameCall {},
                decode_text::<abi::nameCall, abi::legacy::nameCall>,
            ),
            self.probe(
                address,
                "symbol",
                abi::symbolCall {},
                decode_text::<abi::symbolCall, abi::legacy::symbolCall>,
            ),
            self.probe(
                address,
                "decimals",
                abi::decimalsCall {},
                decode::<abi::decimalsCall>,
            ),
            self.probe(
                address,
                "totalSupply",
                abi::totalSupplyCall {},
                decode_quantity,
            ),
        );

        ContractMetadata::from_probes(MetadataProbes {
            name,
            symbol,
            decimals,
            total_supply,
        })
    }
}
