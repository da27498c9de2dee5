//! `TelegramSink`: the renderer's `ChatMessageSink` implemented over a
//! `teloxide::Bot`.

use async_trait::async_trait;
use bridge_progress::{ChatMessageSink, MessageHandle, SinkError};
use teloxide::prelude::Requester;
use teloxide::types::{ChatId, MessageId, ThreadId};
use teloxide::Bot;

pub struct TelegramSink {
    bot: Bot,
    chat_id: ChatId,
    thread_id: Option<ThreadId>,
}

impl TelegramSink {
    pub fn new(bot: Bot, chat_id: ChatId, thread_id: Option<ThreadId>) -> Self {
        Self { bot, chat_id, thread_id }
    }
}

#[async_trait]
impl ChatMessageSink for TelegramSink {
    async fn send(&self, text: &str) -> Result<MessageHandle, SinkError> {
        let mut request = self.bot.send_message(self.chat_id, text);
        if let Some(thread_id) = self.thread_id {
            request = request.message_thread_id(thread_id);
        }
        let message = request.await.map_err(|e| SinkError::Transport(e.to_string()))?;
        Ok(MessageHandle(message.id.0.to_string()))
    }

    async fn edit(&self, handle: &MessageHandle, text: &str) -> Result<(), SinkError> {
        let message_id: i32 = handle.0.parse().map_err(|_| SinkError::Transport(format!("bad message handle {}", handle.0)))?;
        self.bot
            .edit_message_text(self.chat_id, MessageId(message_id), text)
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))?;
        Ok(())
    }
}
