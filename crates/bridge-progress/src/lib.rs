//! Progress Renderer: renders a running agent query's activity as one or
//! more throttled, rolling chat messages.

pub mod entry;
pub mod render;
pub mod renderer;
pub mod sink;

pub use entry::{ActivityEntry, ActivityKind};
pub use renderer::ProgressRenderer;
pub use sink::{ChatMessageSink, MessageHandle, SinkError};

#[cfg(any(test, feature = "test-util"))]
pub use sink::recording::RecordingSink;
