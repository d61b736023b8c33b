//! JSON-RPC 2.0 transport.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::errors::ResolverError;
use crate::provider::check_status;

const SERVICE: &str = "node";

/// Sends a single JSON-RPC request and returns its `result` member.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ResolverError>;
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

impl RpcResponse {
    fn into_result(self) -> Result<Value, ResolverError> {
        if let Some(error) = self.error {
            return Err(ResolverError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        self.result
            .ok_or_else(|| ResolverError::Decode("JSON-RPC response has no result".into()))
    }
}

/// HTTP transport for a JSON-RPC node.
pub struct HttpRpcTransport {
    client: Client,
    url: String,
    timeout: Duration,
    next_id: AtomicU64,
}

impl HttpRpcTransport {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            url: url.into(),
            timeout,
            next_id: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl RpcTransport for HttpRpcTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ResolverError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        debug!("RPC request #{}: {}", id, method);

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ResolverError::Timeout {
                        operation: method.to_string(),
                        timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                    }
                } else {
                    ResolverError::Network(e)
                }
            })?;

        check_status(SERVICE, response.status())?;

        let parsed: RpcResponse = response.json().await?;
        parsed.into_result()
    }
}
