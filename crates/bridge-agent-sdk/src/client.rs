//! The `AgentClient` contract: connect, query, receive messages, interrupt,
//! disconnect, get_server_info.
//!
//! The agent itself is out of scope — this crate only fixes the shape the
//! rest of the workspace programs against (`bridge-actor` holds a
//! `Box<dyn AgentClient>`).

use async_trait::async_trait;

use crate::content::ContentBlock;
use crate::error::Result;
use crate::message::SdkMessage;
use crate::options::AgentOptions;

/// One named slash-command the agent CLI exposes after connecting.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailableCommand {
    pub name: String,
    pub description: String,
    pub argument_hint: Option<String>,
}

/// Server metadata returned by `get_server_info`.
#[derive(Debug, Clone, Default)]
pub struct ServerInfo {
    pub commands: Vec<AvailableCommand>,
}

/// An agent SDK client bound to a single subprocess/IPC channel.
///
/// `connect()` may only be called once; every subsequent method assumes
/// the caller is on the task that called `connect()` (the cancellation-
/// scope discipline `bridge-actor` exists to satisfy).
#[async_trait]
pub trait AgentClient: Send + Sync {
    /// Establish the subprocess or IPC channel.
    async fn connect(&mut self, options: &AgentOptions) -> Result<()>;

    /// Submit one query via the structured-prompt path: an async iterable
    /// yielding exactly one `{type: "user", ...}` record carrying `blocks`.
    async fn query(&mut self, blocks: Vec<ContentBlock>) -> Result<()>;

    /// Pull the next message from the current query's response stream, or
    /// `None` once the stream is exhausted (after a `Result` message).
    async fn receive_message(&mut self) -> Result<Option<SdkMessage>>;

    /// Interrupt the in-flight query, if any. Safe to call at any time;
    /// a no-op if nothing is in flight.
    async fn interrupt(&mut self) -> Result<()>;

    /// Tear down the channel. Best-effort; errors are logged by the caller
    /// and never propagated further.
    async fn disconnect(&mut self) -> Result<()>;

    /// Server metadata, including the available slash commands.
    async fn get_server_info(&mut self) -> Result<ServerInfo>;
}
