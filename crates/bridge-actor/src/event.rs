//! `ActorEvent`: the vocabulary `on_stream` callbacks receive. A thin
//! reshaping of `bridge_stream::StreamEvent` into what a caller (normally
//! the Progress Renderer) actually needs to render.

use std::sync::Arc;

/// One piece of progress pushed out of `process_item`'s stream loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ActorEvent {
    Text(String),
    ToolUse { name: String, input: serde_json::Value },
    ToolResult(String),
    Thinking(String),
}

/// Invoked only from the actor's own worker task — callers need no locks.
pub type StreamCallback = Arc<dyn Fn(ActorEvent) + Send + Sync>;

/// Invoked exactly once, after the worker task exits for any reason.
pub type OnExit = Arc<dyn Fn() + Send + Sync>;
