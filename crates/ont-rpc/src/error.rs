//! Error types for RPC operations.

/// Errors that can occur when submitting transactions to a node.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// The node rejected the request or execution failed.
    #[error("remote execution failed ({code}): {desc}")]
    RemoteExecution {
        /// Node error code, zero when only the execution state failed.
        code: i64,
        /// Description reported by the node.
        desc: String,
    },

    /// The connection was lost or could not be established.
    #[error("connection error: {0}")]
    Connection(String),

    /// No response or notification arrived in time.
    #[error("request timed out")]
    Timeout,

    /// The request could not be formed (e.g. the raw transaction does not
    /// parse).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to serialize or deserialize data.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
