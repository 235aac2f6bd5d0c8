//! JSON-RPC 2.0 over HTTP.
//!
//! Stateless counterpart of the WebSocket client. There is no push
//! channel, so `BroadcastAndWait` polls `getsmartcodeevent` until the
//! transaction's execution notification appears.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::client::{check_notification, check_simulation, tx_hash_of, RpcClient};
use crate::error::RpcError;
use crate::types::{JsonRpcConfig, RpcResponse, SendMode, ACTION_NOTIFY};

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Value,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    desc: String,
    #[serde(default)]
    error: i64,
    #[serde(default)]
    result: Value,
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    jsonrpc: String,
}

/// HTTP JSON-RPC client.
#[derive(Debug)]
pub struct JsonRpcClient {
    config: JsonRpcConfig,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    /// Create a new client with the given configuration.
    pub fn new(config: JsonRpcConfig) -> Result<Self, RpcError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            config,
            client,
            next_id: AtomicU64::new(1),
        })
    }

    /// Call `method` and return the node's reply in response form.
    pub async fn call(&self, method: &str, params: Value) -> Result<RpcResponse, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id,
        };
        let reply: JsonRpcResponse = self
            .client
            .post(&self.config.url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(RpcResponse {
            action: method.to_string(),
            desc: reply.desc,
            error: reply.error,
            result: reply.result,
            id: reply.id,
            version: reply.jsonrpc,
        })
    }

    /// Fetch the execution notification of `tx_hash`, if it is on chain.
    pub async fn smart_code_event(&self, tx_hash: &str) -> Result<Option<RpcResponse>, RpcError> {
        let resp = self
            .call("getsmartcodeevent", json!([tx_hash]))
            .await?
            .into_success()?;
        if resp.result.get("TxHash").is_none() {
            return Ok(None);
        }
        Ok(Some(RpcResponse {
            action: ACTION_NOTIFY.to_string(),
            ..resp
        }))
    }

    /// Submit a raw transaction. See [`RpcClient::send`].
    pub async fn send_raw(&self, raw_tx_hex: &str, mode: SendMode) -> Result<RpcResponse, RpcError> {
        let hash = match mode {
            SendMode::BroadcastAndWait => Some(tx_hash_of(raw_tx_hex)?),
            _ => None,
        };
        let params = match mode {
            SendMode::Simulate => json!([raw_tx_hex, 1]),
            _ => json!([raw_tx_hex]),
        };
        let resp = self
            .call("sendrawtransaction", params)
            .await?
            .into_success()?;
        debug!(?mode, "sent transaction");

        match (mode, hash) {
            (SendMode::Simulate, _) => check_simulation(resp),
            (SendMode::BroadcastAndWait, Some(hash)) => {
                check_notification(self.poll_event(&hash).await?)
            }
            _ => Ok(resp),
        }
    }

    async fn poll_event(&self, tx_hash: &str) -> Result<RpcResponse, RpcError> {
        let deadline = Instant::now() + self.config.notify_timeout;
        loop {
            match self.smart_code_event(tx_hash).await {
                Ok(Some(event)) => return Ok(event),
                Ok(None) => {}
                // Nodes answer "unknown transaction" until the block lands.
                Err(RpcError::RemoteExecution { code, desc }) => {
                    debug!(code, desc = %desc, "event not available yet");
                }
                Err(e) => return Err(e),
            }
            if Instant::now() + self.config.poll_interval > deadline {
                warn!(tx = tx_hash, "gave up waiting for execution notification");
                return Err(RpcError::Timeout);
            }
            sleep(self.config.poll_interval).await;
        }
    }
}

impl RpcClient for JsonRpcClient {
    async fn send(&self, raw_tx_hex: &str, mode: SendMode) -> Result<RpcResponse, RpcError> {
        self.send_raw(raw_tx_hex, mode).await
    }
}
