//! `ChatMessageSink`: the renderer's weak-reference view onto the chat
//! platform. `bridge-telegram` implements this over a teloxide `Bot`.

use async_trait::async_trait;
use thiserror::Error;

/// An opaque handle to a sent chat message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageHandle(pub String);

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("chat platform send/edit failed: {0}")]
    Transport(String),
}

/// Send/edit capability the renderer needs. Errors are logged and
/// swallowed by the renderer — a transport hiccup must never abort the
/// in-flight query.
#[async_trait]
pub trait ChatMessageSink: Send + Sync {
    async fn send(&self, text: &str) -> Result<MessageHandle, SinkError>;
    async fn edit(&self, handle: &MessageHandle, text: &str) -> Result<(), SinkError>;
}

/// An in-memory `ChatMessageSink` for tests: records every send/edit call
/// without touching a real chat platform.
#[cfg(any(test, feature = "test-util"))]
pub mod recording {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    pub enum SinkCall {
        Send { handle: MessageHandle, text: String },
        Edit { handle: MessageHandle, text: String },
    }

    #[derive(Default)]
    pub struct RecordingSink {
        calls: Mutex<Vec<SinkCall>>,
        next_id: Mutex<u64>,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn calls(&self) -> Vec<SinkCall> {
            self.calls.lock().unwrap().clone()
        }

        pub fn send_count(&self) -> usize {
            self.calls.lock().unwrap().iter().filter(|c| matches!(c, SinkCall::Send { .. })).count()
        }

        pub fn edit_count(&self) -> usize {
            self.calls.lock().unwrap().iter().filter(|c| matches!(c, SinkCall::Edit { .. })).count()
        }

        pub fn last_text_for(&self, handle: &MessageHandle) -> Option<String> {
            self.calls.lock().unwrap().iter().rev().find_map(|c| match c {
                SinkCall::Send { handle: h, text } | SinkCall::Edit { handle: h, text } if h == handle => {
                    Some(text.clone())
                }
                _ => None,
            })
        }
    }

    #[async_trait]
    impl ChatMessageSink for RecordingSink {
        async fn send(&self, text: &str) -> Result<MessageHandle, SinkError> {
            let mut next_id = self.next_id.lock().unwrap();
            let handle = MessageHandle(format!("msg-{}", *next_id));
            *next_id += 1;
            self.calls.lock().unwrap().push(SinkCall::Send { handle: handle.clone(), text: text.to_string() });
            Ok(handle)
        }

        async fn edit(&self, handle: &MessageHandle, text: &str) -> Result<(), SinkError> {
            self.calls
                .lock()
                .unwrap()
                .push(SinkCall::Edit { handle: handle.clone(), text: text.to_string() });
            Ok(())
        }
    }
}
