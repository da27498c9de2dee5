//! Errors surfaced by the `UserClientActor`'s public API.

use bridge_agent_sdk::AgentSdkError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActorError {
    /// `Start()`'s call to `connect()` failed; the actor never reached a
    /// running state.
    #[error("failed to start agent client: {0}")]
    StartFailed(String),

    /// `Submit()`/`Stop()`/`Interrupt()` called after the worker has exited
    /// (idle timeout, `Stop()`, or a connect failure).
    #[error("actor is not running")]
    NotRunning,

    /// The SDK raised mid-query; the submitting caller's promise completes
    /// with this error, but the actor itself stays up.
    #[error(transparent)]
    Sdk(#[from] AgentSdkError),

    /// The receive stream ended (returned `None`) without ever yielding a
    /// `Result` message.
    #[error("agent stream ended without a result")]
    StreamEnded,
}

pub type Result<T> = std::result::Result<T, ActorError>;
