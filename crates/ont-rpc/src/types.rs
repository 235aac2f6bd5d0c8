//! RPC data types: client configuration, send modes, and typed response
//! structures.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RpcError;

/// Description the node attaches to successful responses.
pub const DESC_SUCCESS: &str = "SUCCESS";

/// Action name of asynchronous execution notifications.
pub const ACTION_NOTIFY: &str = "Notify";

/// How a transaction is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SendMode {
    /// Pre-execute without committing; resolves with the simulated result.
    Simulate,
    /// Submit; resolves once the node acknowledges the transaction.
    Broadcast,
    /// Submit; resolves with the execution notification once the
    /// transaction lands in a block.
    BroadcastAndWait,
}

/// Configuration for a [`WsRpcClient`](crate::WsRpcClient).
#[derive(Debug, Clone)]
pub struct WsRpcConfig {
    /// WebSocket endpoint (e.g. `ws://127.0.0.1:20335`).
    pub url: String,
    /// Bound on waiting for a request's acknowledgement.
    pub request_timeout: Duration,
    /// Bound on waiting for an execution notification.
    pub notify_timeout: Duration,
    /// Interval between heartbeat frames.
    pub heartbeat_interval: Duration,
}

impl Default for WsRpcConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:20335".to_string(),
            request_timeout: Duration::from_secs(30),
            notify_timeout: Duration::from_secs(60),
            heartbeat_interval: Duration::from_secs(5),
        }
    }
}

/// Configuration for a [`JsonRpcClient`](crate::JsonRpcClient).
#[derive(Debug, Clone)]
pub struct JsonRpcConfig {
    /// JSON-RPC endpoint (e.g. `http://127.0.0.1:20336`).
    pub url: String,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
    /// Bound on polling for an execution notification.
    pub notify_timeout: Duration,
    /// Delay between event polls.
    pub poll_interval: Duration,
}

impl Default for JsonRpcConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:20336".to_string(),
            request_timeout: Duration::from_secs(30),
            notify_timeout: Duration::from_secs(60),
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// Outbound WebSocket frame.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WsRequest<'a> {
    pub action: &'a str,
    pub version: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_exec: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<&'a str>,
}

/// A node response or notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RpcResponse {
    /// The request action this answers, or `Notify`.
    #[serde(default)]
    pub action: String,
    /// `SUCCESS` or an error description.
    #[serde(default)]
    pub desc: String,
    /// Numeric error code; zero on success.
    #[serde(default)]
    pub error: i64,
    /// Action-specific payload.
    #[serde(default)]
    pub result: Value,
    /// Request id, absent on notifications.
    #[serde(default)]
    pub id: Option<u64>,
    /// Protocol version.
    #[serde(default)]
    pub version: String,
}

impl RpcResponse {
    /// Whether the node reported success.
    pub fn is_success(&self) -> bool {
        self.error == 0 && self.desc == DESC_SUCCESS
    }

    /// Pass successful responses through; turn failures into
    /// `RemoteExecution`.
    pub fn into_success(self) -> Result<Self, RpcError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(RpcError::RemoteExecution {
                code: self.error,
                desc: self.desc,
            })
        }
    }

    /// Interpret `result` as a simulation result.
    pub fn pre_exec_result(&self) -> Result<PreExecResult, RpcError> {
        Ok(PreExecResult::deserialize(&self.result)?)
    }

    /// Interpret `result` as an execution notification.
    pub fn execute_notify(&self) -> Result<ExecuteNotify, RpcError> {
        Ok(ExecuteNotify::deserialize(&self.result)?)
    }

    /// The transaction hash a broadcast acknowledgement carries.
    pub fn tx_hash(&self) -> Option<&str> {
        match &self.result {
            Value::String(hash) => Some(hash),
            Value::Object(map) => map.get("TxHash").and_then(Value::as_str),
            _ => None,
        }
    }
}

/// Outcome of pre-executing a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PreExecResult {
    /// 1 on success, 0 on failure.
    pub state: u8,
    /// Gas the execution would consume.
    #[serde(default, deserialize_with = "number_or_string")]
    pub gas: u64,
    /// The contract's return value, hex encoded leaves.
    #[serde(default)]
    pub result: Value,
}

/// Execution notification for a committed transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExecuteNotify {
    /// Hash of the executed transaction.
    pub tx_hash: String,
    /// 1 on success, 0 on failure.
    pub state: u8,
    /// Gas consumed by execution.
    #[serde(default, deserialize_with = "number_or_string")]
    pub gas_consumed: u64,
    /// Events emitted during execution.
    #[serde(default)]
    pub notify: Vec<NotifyEvent>,
}

/// An event emitted by a contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NotifyEvent {
    /// Emitting contract, hex.
    pub contract_address: String,
    /// Event payload.
    #[serde(default)]
    pub states: Value,
}

/// Nodes report gas either as a JSON number or a decimal string.
fn number_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| D::Error::custom(format!("gas {n} is not a u64"))),
        Value::String(s) => s.parse().map_err(D::Error::custom),
        Value::Null => Ok(0),
        other => Err(D::Error::custom(format!("unexpected gas value {other}"))),
    }
}
