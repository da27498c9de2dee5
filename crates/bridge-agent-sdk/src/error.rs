//! Error types for the agent SDK contract.

use thiserror::Error;

/// Errors an `AgentClient` implementation may raise.
#[derive(Debug, Error)]
pub enum AgentSdkError {
    /// `connect()` was called more than once on the same client.
    #[error("agent client already connected")]
    AlreadyConnected,

    /// The subprocess or IPC channel could not be established.
    #[error("failed to connect to agent: {0}")]
    ConnectFailed(String),

    /// The agent process died or the channel closed mid-query.
    #[error("agent connection lost: {0}")]
    ConnectionLost(String),

    /// `query()` was called before `connect()` or after `disconnect()`.
    #[error("agent client is not connected")]
    NotConnected,

    /// The SDK rejected an option or field.
    #[error("agent rejected option {field}: {reason}")]
    InvalidOption { field: String, reason: String },

    /// A protocol-level message could not be parsed; logged and skipped,
    /// never fatal to the query in progress.
    #[error("malformed SDK message: {0}")]
    ProtocolError(String),
}

/// Result type for agent SDK operations.
pub type Result<T> = std::result::Result<T, AgentSdkError>;
