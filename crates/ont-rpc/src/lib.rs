#![deny(missing_docs)]

//! # ont-rpc
//!
//! Clients for submitting signed transactions to an Ontology node and
//! correlating them with their outcome: an immediate simulated result, an
//! acknowledgement, or the execution notification that arrives once the
//! transaction is in a block.
//!
//! Two transports implement [`RpcClient`]: a persistent WebSocket
//! connection ([`WsRpcClient`]) and stateless JSON-RPC over HTTP
//! ([`JsonRpcClient`]).
//!
//! # Example
//!
//! ```no_run
//! use ont_rpc::{RpcClient, SendMode, WsRpcClient, WsRpcConfig};
//!
//! # async fn run(raw_tx_hex: &str) -> Result<(), ont_rpc::RpcError> {
//! let client = WsRpcClient::connect(WsRpcConfig {
//!     url: "ws://127.0.0.1:20335".to_string(),
//!     ..Default::default()
//! })
//! .await?;
//! let simulated = client.send(raw_tx_hex, SendMode::Simulate).await?;
//! println!("{}", simulated.pre_exec_result()?.result);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod deployment;
pub mod error;
pub mod http;
pub mod pending;
pub mod types;
pub mod ws;

#[cfg(test)]
mod tests;

pub use client::RpcClient;
pub use deployment::{Deployment, DeploymentState};
pub use error::RpcError;
pub use http::JsonRpcClient;
pub use types::{
    ExecuteNotify, JsonRpcConfig, NotifyEvent, PreExecResult, RpcResponse, SendMode, WsRpcConfig,
};
pub use ws::WsRpcClient;
