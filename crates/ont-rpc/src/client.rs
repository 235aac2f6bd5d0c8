//! The transport-independent client interface.

use std::future::Future;

use ont_transaction::Transaction;

use crate::error::RpcError;
use crate::types::{RpcResponse, SendMode};

/// Submits raw transactions to a node.
pub trait RpcClient {
    /// Submit `raw_tx_hex` and resolve according to `mode`.
    ///
    /// Resolves with the acknowledgement (`Broadcast`), the simulated
    /// result (`Simulate`) or the execution notification
    /// (`BroadcastAndWait`). Failures reported by the node, including a
    /// failed execution state, resolve to `RemoteExecution`.
    fn send(
        &self,
        raw_tx_hex: &str,
        mode: SendMode,
    ) -> impl Future<Output = Result<RpcResponse, RpcError>> + Send;

    /// Serialize and submit a transaction.
    fn send_transaction(
        &self,
        tx: &Transaction,
        mode: SendMode,
    ) -> impl Future<Output = Result<RpcResponse, RpcError>> + Send
    where
        Self: Sync,
    {
        let raw = tx
            .to_hex()
            .map_err(|e| RpcError::InvalidRequest(e.to_string()));
        async move { self.send(&raw?, mode).await }
    }
}

/// Display hash of a raw transaction, used to match its notification.
pub(crate) fn tx_hash_of(raw_tx_hex: &str) -> Result<String, RpcError> {
    Transaction::from_hex(raw_tx_hex)
        .map(|tx| tx.hash_hex())
        .map_err(|e| RpcError::InvalidRequest(format!("raw transaction: {e}")))
}

/// Reject a simulation whose execution state is failure.
pub(crate) fn check_simulation(resp: RpcResponse) -> Result<RpcResponse, RpcError> {
    let result = resp.pre_exec_result()?;
    if result.state == 0 {
        return Err(RpcError::RemoteExecution {
            code: 0,
            desc: "pre-execution failed".to_string(),
        });
    }
    Ok(resp)
}

/// Reject a notification whose execution state is failure.
pub(crate) fn check_notification(resp: RpcResponse) -> Result<RpcResponse, RpcError> {
    let notify = resp.execute_notify()?;
    if notify.state == 0 {
        return Err(RpcError::RemoteExecution {
            code: 0,
            desc: format!("transaction {} failed to execute", notify.tx_hash),
        });
    }
    Ok(resp)
}
