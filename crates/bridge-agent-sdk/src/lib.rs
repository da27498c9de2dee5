//! The agent SDK contract this bridge programs against.
//!
//! The agent's own reasoning is out of scope; this crate fixes the shape
//! everything else programs against — content blocks, the structured-
//! prompt envelope, `Query`/`QueryResult`, the `AgentClient` trait, a
//! subprocess transport that speaks the CLI's `stream-json` wire format,
//! and (behind the `test-util` feature) a scripted test double.

pub mod client;
pub mod content;
pub mod error;
pub mod message;
pub mod options;
pub mod process;
pub mod query;

#[cfg(feature = "test-util")]
pub mod mock;

pub use client::{AgentClient, AvailableCommand, ServerInfo};
pub use content::{ContentBlock, DocumentSource, ImageSource, InnerUserMessage, UserMessageEnvelope};
pub use error::{AgentSdkError, Result};
pub use message::{AssistantBlock, SdkMessage};
pub use options::{AgentOptions, PermissionCallback, PermissionDecision};
pub use process::SubprocessAgentClient;
pub use query::{Attachment, Query, QueryResult};

#[cfg(feature = "test-util")]
pub use mock::MockAgentClient;
