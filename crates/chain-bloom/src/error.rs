//! Error types for the chain-bloom filters

use thiserror::Error;

/// Errors surfaced by filter construction and the remote filter engine
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Invalid filter parameters: {0}")]
    InvalidParameters(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Unexpected reply to {operation}: {reply}")]
    UnexpectedReply {
        operation: &'static str,
        reply: String,
    },

    #[error("Snapshot error: {0}")]
    Snapshot(String),
}

/// Errors from the script execution layer
///
/// Transport and pool errors are passed through to the caller untouched.
/// Nothing in this crate retries them.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Timed out waiting for a pooled connection")]
    PoolTimeout,

    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Timeout")]
    Timeout,

    #[error("Script error: {0}")]
    Script(String),

    #[error("Bit absent under key {key}")]
    BitAbsent { key: String },
}

impl StoreError {
    /// Whether the error came from acquiring or using the transport
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            StoreError::PoolTimeout
                | StoreError::Pool(_)
                | StoreError::Connection(_)
                | StoreError::Timeout
        )
    }
}
