//! The actor's long-lived worker task: owns the `AgentClient` and is the
//! only task that ever calls `connect`/`query`/`disconnect` on it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bridge_agent_sdk::{AgentClient, AgentOptions, AvailableCommand, QueryResult};
use bridge_stream::{classify, StreamEventKind};
use tokio::sync::{mpsc, oneshot, Notify, RwLock};

use crate::error::ActorError;
use crate::event::{ActorEvent, OnExit};
use crate::work::{Command, WorkItem};

pub(crate) struct Worker {
    pub client: Box<dyn AgentClient>,
    pub options: AgentOptions,
    pub cmd_rx: mpsc::Receiver<Command>,
    pub idle_timeout: Duration,
    pub interrupt_notify: Arc<Notify>,
    pub querying: Arc<AtomicBool>,
    pub available_commands: Arc<RwLock<Vec<AvailableCommand>>>,
    pub on_exit: OnExit,
}

impl Worker {
    pub(crate) async fn run(mut self, connected_tx: oneshot::Sender<Result<(), String>>) {
        if let Err(e) = self.client.connect(&self.options).await {
            let _ = connected_tx.send(Err(e.to_string()));
            return;
        }
        let _ = connected_tx.send(Ok(()));

        match self.client.get_server_info().await {
            Ok(info) => *self.available_commands.write().await = info.commands,
            Err(e) => {
                tracing::warn!(error = %e, "get_server_info failed after connect");
                *self.available_commands.write().await = Vec::new();
            }
        }

        loop {
            match tokio::time::timeout(self.idle_timeout, self.cmd_rx.recv()).await {
                Ok(Some(Command::Query(item))) => self.process_item(item).await,
                Ok(Some(Command::Stop)) => break,
                Ok(None) => break,
                Err(_elapsed) => {
                    tracing::debug!("actor idle timeout, exiting");
                    break;
                }
            }
        }

        *self.available_commands.write().await = Vec::new();
        if let Err(e) = self.client.disconnect().await {
            tracing::warn!(error = %e, "agent disconnect failed on actor exit");
        }
        (self.on_exit)();
    }

    async fn process_item(&mut self, item: WorkItem) {
        self.querying.store(true, Ordering::SeqCst);
        let result = self.run_query(item.query.to_content_blocks(), &item.on_stream).await;
        self.querying.store(false, Ordering::SeqCst);
        let _ = item.respond_to.send(result);
    }

    async fn run_query(
        &mut self,
        blocks: Vec<bridge_agent_sdk::ContentBlock>,
        on_stream: &crate::event::StreamCallback,
    ) -> Result<QueryResult, ActorError> {
        self.client.query(blocks).await?;

        let start = Instant::now();
        let mut num_turns: u32 = 0;

        loop {
            tokio::select! {
                _ = self.interrupt_notify.notified() => {
                    if let Err(e) = self.client.interrupt().await {
                        tracing::warn!(error = %e, "interrupt forwarding failed");
                    }
                }
                msg = self.client.receive_message() => {
                    match msg? {
                        None => return Err(ActorError::StreamEnded),
                        Some(raw) => {
                            let event = classify(&raw);
                            match event.kind {
                                Some(StreamEventKind::Result) => {
                                    return Ok(QueryResult {
                                        response_text: event.content,
                                        session_id: event.session_id,
                                        cost: event.cost,
                                        num_turns,
                                        duration_ms: start.elapsed().as_millis() as u64,
                                    });
                                }
                                Some(StreamEventKind::Text) if !event.content.is_empty() => {
                                    on_stream(ActorEvent::Text(event.content));
                                }
                                Some(StreamEventKind::ToolUse) => {
                                    if !event.is_partial {
                                        num_turns += 1;
                                    }
                                    let input = event
                                        .tool_input
                                        .map(|m| serde_json::to_value(m).unwrap_or(serde_json::Value::Null))
                                        .unwrap_or(serde_json::Value::Null);
                                    on_stream(ActorEvent::ToolUse {
                                        name: event.tool_name.unwrap_or_default(),
                                        input,
                                    });
                                }
                                Some(StreamEventKind::Thinking) if !event.content.is_empty() => {
                                    on_stream(ActorEvent::Thinking(event.content));
                                }
                                Some(StreamEventKind::ToolResult) if !event.content.is_empty() => {
                                    on_stream(ActorEvent::ToolResult(event.content));
                                }
                                _ => {}
                            }
                        }
                    }
                }
            }
        }
    }
}
