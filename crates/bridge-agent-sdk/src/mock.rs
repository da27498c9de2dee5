//! A scripted `AgentClient` test double.
//!
//! Exposed behind the `test-util` feature so `bridge-actor` and
//! `bridge-manager` can exercise the actor/manager state machines without a
//! real agent subprocess, the same role `MockAdapter` plays for
//! `RuntimeAdapter` in the donor workspace's runtime tests.

use std::collections::VecDeque;

use async_trait::async_trait;

use crate::client::{AgentClient, ServerInfo};
use crate::content::ContentBlock;
use crate::error::{AgentSdkError, Result};
use crate::message::SdkMessage;
use crate::options::AgentOptions;

/// A fixed sequence of `SdkMessage`s to replay for one `query()` call.
#[derive(Default)]
pub struct MockAgentClient {
    connected: bool,
    connect_error: Option<String>,
    server_info: ServerInfo,
    scripted_responses: VecDeque<VecDeque<SdkMessage>>,
    current_stream: VecDeque<SdkMessage>,
    pub queries_received: Vec<Vec<ContentBlock>>,
    pub interrupt_count: u32,
    pub disconnect_count: u32,
}

impl MockAgentClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `connect()` call with the given message.
    pub fn fail_connect(mut self, message: impl Into<String>) -> Self {
        self.connect_error = Some(message.into());
        self
    }

    /// Queue one script of messages to be replayed for the next `query()`.
    pub fn with_response(mut self, messages: Vec<SdkMessage>) -> Self {
        self.scripted_responses.push_back(messages.into());
        self
    }

    pub fn with_server_info(mut self, info: ServerInfo) -> Self {
        self.server_info = info;
        self
    }
}

#[async_trait]
impl AgentClient for MockAgentClient {
    async fn connect(&mut self, _options: &AgentOptions) -> Result<()> {
        if self.connected {
            return Err(AgentSdkError::AlreadyConnected);
        }
        if let Some(msg) = self.connect_error.take() {
            return Err(AgentSdkError::ConnectFailed(msg));
        }
        self.connected = true;
        Ok(())
    }

    async fn query(&mut self, blocks: Vec<ContentBlock>) -> Result<()> {
        if !self.connected {
            return Err(AgentSdkError::NotConnected);
        }
        self.queries_received.push(blocks);
        self.current_stream = self
            .scripted_responses
            .pop_front()
            .unwrap_or_default();
        Ok(())
    }

    async fn receive_message(&mut self) -> Result<Option<SdkMessage>> {
        Ok(self.current_stream.pop_front())
    }

    async fn interrupt(&mut self) -> Result<()> {
        self.interrupt_count += 1;
        self.current_stream.clear();
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.disconnect_count += 1;
        self.connected = false;
        Ok(())
    }

    async fn get_server_info(&mut self) -> Result<ServerInfo> {
        if !self.connected {
            return Err(AgentSdkError::NotConnected);
        }
        Ok(self.server_info.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_scripted_messages_in_order() {
        let mut client = MockAgentClient::new().with_response(vec![
            SdkMessage::Assistant { blocks: vec![] },
            SdkMessage::Result {
                result: "done".into(),
                session_id: "s1".into(),
                total_cost_usd: Some(0.1),
            },
        ]);
        let options = AgentOptions {
            cwd: "/tmp".into(),
            resume_session_id: None,
            model: None,
            betas: vec![],
            permission_mode: "bypass",
            system_prompt: String::new(),
            permission_callback: None,
        };
        client.connect(&options).await.unwrap();
        client.query(vec![ContentBlock::text("hi")]).await.unwrap();

        let first = client.receive_message().await.unwrap();
        assert!(matches!(first, Some(SdkMessage::Assistant { .. })));
        let second = client.receive_message().await.unwrap();
        assert!(matches!(second, Some(SdkMessage::Result { .. })));
        let third = client.receive_message().await.unwrap();
        assert!(third.is_none());
    }

    #[tokio::test]
    async fn query_before_connect_fails() {
        let mut client = MockAgentClient::new();
        let err = client.query(vec![]).await.unwrap_err();
        assert!(matches!(err, AgentSdkError::NotConnected));
    }

    #[tokio::test]
    async fn connect_twice_fails() {
        let options = AgentOptions {
            cwd: "/tmp".into(),
            resume_session_id: None,
            model: None,
            betas: vec![],
            permission_mode: "bypass",
            system_prompt: String::new(),
            permission_callback: None,
        };
        let mut client = MockAgentClient::new();
        client.connect(&options).await.unwrap();
        let err = client.connect(&options).await.unwrap_err();
        assert!(matches!(err, AgentSdkError::AlreadyConnected));
    }
}
