//! Raw, heterogeneous messages as delivered by `AgentClient::receive_messages`.
//!
//! These are the inputs to the Stream Handler (`bridge-stream`), which
//! flattens them into a single `StreamEvent` tagged sum. Modeled here
//! rather than downstream so any `AgentClient` implementation speaks the
//! same vocabulary.

use std::collections::HashMap;

use crate::client::AvailableCommand;

/// One block inside an `AssistantMessage`.
#[derive(Debug, Clone, PartialEq)]
pub enum AssistantBlock {
    Text { text: String },
    Thinking { text: String },
    ToolUse { name: String, input: HashMap<String, serde_json::Value>, is_partial: bool },
}

/// One raw message from the SDK's receive stream.
#[derive(Debug, Clone, PartialEq)]
pub enum SdkMessage {
    Assistant { blocks: Vec<AssistantBlock> },
    User { content: String },
    Result { result: String, session_id: String, total_cost_usd: Option<f64> },
    /// The reply to a `{"type": "control", "subtype": "get_server_info"}`
    /// request: the server's available slash commands.
    ControlResponse { commands: Vec<AvailableCommand> },
    Other,
}
