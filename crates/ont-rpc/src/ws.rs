//! WebSocket client.
//!
//! One connection is shared by every caller. Outbound frames funnel
//! through a writer task; a reader task parses inbound frames and hands
//! each to the pending entry keyed by its request id or, for `Notify`
//! frames, by transaction hash. A heartbeat task keeps the session alive.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

use crate::client::{check_notification, check_simulation, tx_hash_of, RpcClient};
use crate::error::RpcError;
use crate::pending::{PendingKey, PendingTable};
use crate::types::{RpcResponse, SendMode, WsRequest, WsRpcConfig, ACTION_NOTIFY};

const PROTOCOL_VERSION: &str = "1.0.0";
const ACTION_SEND: &str = "sendrawtransaction";
const ACTION_HEARTBEAT: &str = "heartbeat";

/// WebSocket RPC client.
pub struct WsRpcClient {
    config: WsRpcConfig,
    outbound: mpsc::UnboundedSender<Message>,
    pending: Arc<PendingTable>,
    next_id: AtomicU64,
    tasks: Vec<JoinHandle<()>>,
}

impl WsRpcClient {
    /// Connect to `config.url` and start the connection tasks.
    pub async fn connect(config: WsRpcConfig) -> Result<Self, RpcError> {
        let (stream, _) = connect_async(config.url.as_str())
            .await
            .map_err(|e| RpcError::Connection(format!("connecting to {}: {e}", config.url)))?;
        info!(url = %config.url, "websocket connected");

        let (mut sink, mut source) = stream.split();
        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<Message>();
        let pending = PendingTable::new();

        let writer_pending = Arc::clone(&pending);
        let writer = tokio::spawn(async move {
            while let Some(frame) = outbound_rx.recv().await {
                if let Err(e) = sink.send(frame).await {
                    warn!(error = %e, "websocket write failed");
                    writer_pending.close(&format!("write failed: {e}"));
                    break;
                }
            }
            let _ = sink.close().await;
        });

        let reader_pending = Arc::clone(&pending);
        let reader = tokio::spawn(async move {
            let reason = loop {
                match source.next().await {
                    Some(Ok(Message::Close(_))) | None => break "connection closed".to_string(),
                    Some(Ok(msg)) if msg.is_text() => match msg.to_text() {
                        Ok(text) => dispatch(&reader_pending, text),
                        Err(e) => warn!(error = %e, "non UTF-8 text frame"),
                    },
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break format!("read failed: {e}"),
                }
            };
            info!(reason = %reason, "websocket reader stopped");
            reader_pending.close(&reason);
        });

        let heartbeat_tx = outbound.clone();
        let interval = config.heartbeat_interval;
        let heartbeat = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let frame = WsRequest {
                    action: ACTION_HEARTBEAT,
                    version: PROTOCOL_VERSION,
                    id: None,
                    pre_exec: None,
                    data: None,
                };
                let Ok(text) = serde_json::to_string(&frame) else { break };
                if heartbeat_tx.send(Message::text(text)).is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            config,
            outbound,
            pending,
            next_id: AtomicU64::new(1),
            tasks: vec![writer, reader, heartbeat],
        })
    }

    /// Number of responses and notifications still awaited.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Submit a raw transaction. See [`RpcClient::send`].
    pub async fn send_raw(&self, raw_tx_hex: &str, mode: SendMode) -> Result<RpcResponse, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let ack = self.pending.register(PendingKey::Id(id))?;
        let notification = match mode {
            SendMode::BroadcastAndWait => {
                Some(self.pending.register(PendingKey::Tx(tx_hash_of(raw_tx_hex)?))?)
            }
            _ => None,
        };

        let frame = WsRequest {
            action: ACTION_SEND,
            version: PROTOCOL_VERSION,
            id: Some(id),
            pre_exec: (mode == SendMode::Simulate).then_some("1"),
            data: Some(raw_tx_hex),
        };
        self.outbound
            .send(Message::text(serde_json::to_string(&frame)?))
            .map_err(|_| RpcError::Connection("writer stopped".to_string()))?;
        debug!(id, ?mode, "sent transaction");

        let resp = ack.wait(self.config.request_timeout).await?.into_success()?;
        match (mode, notification) {
            (SendMode::Simulate, _) => check_simulation(resp),
            (SendMode::BroadcastAndWait, Some(notification)) => {
                let notify = notification
                    .wait(self.config.notify_timeout)
                    .await?
                    .into_success()?;
                check_notification(notify)
            }
            _ => Ok(resp),
        }
    }
}

impl RpcClient for WsRpcClient {
    async fn send(&self, raw_tx_hex: &str, mode: SendMode) -> Result<RpcResponse, RpcError> {
        self.send_raw(raw_tx_hex, mode).await
    }
}

impl Drop for WsRpcClient {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Route an inbound frame to its pending entry.
fn dispatch(pending: &PendingTable, text: &str) {
    let resp: RpcResponse = match serde_json::from_str(text) {
        Ok(resp) => resp,
        Err(e) => {
            warn!(error = %e, "unparseable frame");
            return;
        }
    };

    let key = if resp.action == ACTION_NOTIFY {
        resp.result
            .get("TxHash")
            .and_then(Value::as_str)
            .map(|hash| PendingKey::Tx(hash.to_string()))
    } else {
        resp.id.map(PendingKey::Id)
    };

    match key {
        Some(key) => {
            pending.complete(&key, Ok(resp));
        }
        None => debug!(action = %resp.action, "frame without correlation key ignored"),
    }
}
