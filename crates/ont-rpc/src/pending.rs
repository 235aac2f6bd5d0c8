//! Correlation of in-flight requests with their eventual responses.
//!
//! Each awaited response is registered under a key before its request is
//! written. The reader completes entries as frames arrive. A registration
//! is removed when its guard is dropped, so a timed-out or abandoned wait
//! leaves nothing behind and a late frame finds no entry.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::error::RpcError;
use crate::types::RpcResponse;

type Reply = Result<RpcResponse, RpcError>;

/// What a pending entry waits for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PendingKey {
    /// The response to the request with this id.
    Id(u64),
    /// The execution notification for this transaction hash.
    Tx(String),
}

impl fmt::Display for PendingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingKey::Id(id) => write!(f, "id:{id}"),
            PendingKey::Tx(hash) => write!(f, "tx:{hash}"),
        }
    }
}

#[derive(Default)]
struct Inner {
    entries: HashMap<PendingKey, oneshot::Sender<Reply>>,
    closed: Option<String>,
}

/// Table of pending entries shared by callers and the reader task.
#[derive(Default)]
pub struct PendingTable {
    inner: Mutex<Inner>,
}

impl PendingTable {
    /// Create an empty table.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic while holding the lock leaves the map itself intact.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register `key` and get a guard to await its reply on.
    ///
    /// Fails with `Connection` once the table is closed and with
    /// `InvalidRequest` when the key is already awaited.
    pub fn register(self: &Arc<Self>, key: PendingKey) -> Result<PendingGuard, RpcError> {
        let (tx, rx) = oneshot::channel();
        let mut inner = self.lock();
        if let Some(reason) = &inner.closed {
            return Err(RpcError::Connection(reason.clone()));
        }
        if inner.entries.contains_key(&key) {
            return Err(RpcError::InvalidRequest(format!("{key} is already pending")));
        }
        inner.entries.insert(key.clone(), tx);
        debug!(key = %key, "registered pending entry");
        Ok(PendingGuard {
            table: Arc::clone(self),
            key,
            rx,
        })
    }

    /// Deliver `reply` to the entry for `key`.
    ///
    /// Returns false if nothing was waiting for it.
    pub fn complete(&self, key: &PendingKey, reply: Reply) -> bool {
        let sender = self.lock().entries.remove(key);
        match sender {
            Some(tx) => {
                if tx.send(reply).is_err() {
                    debug!(key = %key, "waiter dropped before reply");
                    return false;
                }
                true
            }
            None => {
                debug!(key = %key, "no pending entry, dropping frame");
                false
            }
        }
    }

    /// Resolve every entry with `Connection` and refuse new ones.
    pub fn close(&self, reason: &str) {
        let drained: Vec<_> = {
            let mut inner = self.lock();
            inner.closed = Some(reason.to_string());
            inner.entries.drain().collect()
        };
        if !drained.is_empty() {
            warn!(count = drained.len(), reason, "failing pending requests");
        }
        for (_, tx) in drained {
            let _ = tx.send(Err(RpcError::Connection(reason.to_string())));
        }
    }

    /// Number of entries still waiting.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether no entries are waiting.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn remove(&self, key: &PendingKey) {
        self.lock().entries.remove(key);
    }
}

/// A registration awaiting its reply. Dropping it deregisters the key.
pub struct PendingGuard {
    table: Arc<PendingTable>,
    key: PendingKey,
    rx: oneshot::Receiver<Reply>,
}

impl PendingGuard {
    /// The key this guard waits on.
    pub fn key(&self) -> &PendingKey {
        &self.key
    }

    /// Wait up to `timeout` for the reply.
    pub async fn wait(mut self, timeout: Duration) -> Reply {
        match tokio::time::timeout(timeout, &mut self.rx).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(_)) => Err(RpcError::Connection("reply channel closed".to_string())),
            Err(_) => {
                debug!(key = %self.key, "timed out waiting for reply");
                Err(RpcError::Timeout)
            }
        }
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.table.remove(&self.key);
    }
}
