//! The Orchestrator: inbound text, inbound
//! attachments, command passthrough, and the session-pick /
//! directory-browse inline-keyboard callbacks.

use std::path::PathBuf;
use std::sync::Arc;

use bridge_actor::{ActorEvent, StreamCallback};
use bridge_agent_sdk::{Query, SubprocessAgentClient};
use bridge_attachments::{MediaGroupCollector, RawAttachment};
use bridge_history::SessionResolver;
use bridge_manager::{ClientFactory, ClientManager, ConnectRequest};
use bridge_progress::ProgressRenderer;
use teloxide::prelude::Requester;
use teloxide::types::{CallbackQuery, ChatId, Message, ThreadId};
use teloxide::Bot;
use tokio::sync::{mpsc, Mutex};

use crate::access::AccessControl;
use crate::attachments::extract_raw_attachments;
use crate::error::{Result, TelegramError};
use crate::keyboard::{directory_browser_keyboard, session_picker_keyboard, CallbackPayload};
use crate::session::ChatStateStore;
use crate::sink::TelegramSink;

const DEFAULT_ATTACHMENT_PROMPT: &str = "analyze these";

/// One attachment still waiting out the media-group debounce window.
struct CollectedAttachment {
    user_id: i64,
    chat_id: ChatId,
    thread_id: Option<ThreadId>,
    raw: RawAttachment,
    caption: Option<String>,
}

pub struct Orchestrator {
    bot: Bot,
    manager: ClientManager,
    access: AccessControl,
    chat_states: ChatStateStore,
    session_resolver: SessionResolver,
    group_collector: MediaGroupCollector<CollectedAttachment>,
}

impl Orchestrator {
    pub fn new(
        bot: Bot,
        manager: ClientManager,
        access: AccessControl,
        session_resolver: SessionResolver,
    ) -> Arc<Self> {
        let (group_collector, group_rx) = MediaGroupCollector::new(bridge_core::config::media_group_timeout());
        let orchestrator = Arc::new(Self {
            bot,
            manager,
            access,
            chat_states: ChatStateStore::new(),
            session_resolver,
            group_collector,
        });
        spawn_group_drain(orchestrator.clone(), group_rx);
        orchestrator
    }

    pub fn client_factory() -> ClientFactory {
        Arc::new(|| Box::new(SubprocessAgentClient::new()))
    }

    pub fn access(&self) -> &AccessControl {
        &self.access
    }

    /// Inbound text path: command passthrough, or a plain query.
    pub async fn handle_text(&self, user_id: i64, chat_id: ChatId, thread_id: Option<ThreadId>, text: &str) -> Result<()> {
        if let Some(rest) = text.strip_prefix('/') {
            return self.handle_command_passthrough(user_id, chat_id, rest).await;
        }
        self.run_query_and_respond(user_id, chat_id, thread_id, Query::text(text)).await
    }

    /// Leading `/word args` not claimed by a registered bot command is
    /// passed straight through to the agent as a slash command.
    async fn handle_command_passthrough(&self, user_id: i64, chat_id: ChatId, rest: &str) -> Result<()> {
        let word = rest.split_whitespace().next().unwrap_or_default();
        let commands = self.manager.get_available_commands(user_id).await;
        let claimed = commands.iter().any(|c| c.name == word);

        if claimed {
            return self.run_query_and_respond(user_id, chat_id, None, Query::text(format!("/{rest}"))).await;
        }

        if self.manager.is_connected(user_id).await {
            self.bot.send_message(chat_id, format!("Unknown command: /{word}")).await?;
            return Ok(());
        }

        self.run_query_and_respond(user_id, chat_id, None, Query::text(format!("/{rest}"))).await
    }

    /// Buffers an inbound attachment into the media-group collector; the
    /// drain task calls `process_collected_group` once the debounce window
    /// elapses.
    pub async fn handle_attachment(
        &self,
        bot: &Bot,
        user_id: i64,
        chat_id: ChatId,
        thread_id: Option<ThreadId>,
        message: &Message,
    ) -> Result<()> {
        let caption = message.caption().map(str::to_string);
        let raws = extract_raw_attachments(bot, message).await?;
        let group_id = message.media_group_id().map(str::to_string);

        for raw in raws {
            let item = CollectedAttachment { user_id, chat_id, thread_id, raw, caption: caption.clone() };
            match &group_id {
                Some(id) => self.group_collector.push_grouped(id.clone(), item),
                None => self.group_collector.push_single(item),
            }
        }
        Ok(())
    }

    async fn process_collected_group(&self, group: Vec<CollectedAttachment>) {
        let Some(first) = group.first() else { return };
        let (user_id, chat_id, thread_id) = (first.user_id, first.chat_id, first.thread_id);

        let mut attachments = Vec::new();
        let mut caption = None;
        for item in group {
            if caption.is_none() {
                caption = item.caption;
            }
            match bridge_attachments::process(&item.raw) {
                Ok(attachment) => attachments.push(attachment),
                Err(e) => {
                    let _ = self.bot.send_message(chat_id, format!("Skipping {}: {e}", item.raw.filename)).await;
                }
            }
        }

        if attachments.is_empty() {
            return;
        }

        let text = caption.filter(|c| !c.trim().is_empty()).unwrap_or_else(|| DEFAULT_ATTACHMENT_PROMPT.to_string());
        let query = Query::with_attachments(Some(text), attachments);
        if let Err(e) = self.run_query_and_respond(user_id, chat_id, thread_id, query).await {
            tracing::warn!(error = %e, user_id, "attachment query failed");
        }
    }

    /// Shared tail of both the text and attachment paths: resolve chat
    /// state, run the query, render progress, and reply.
    async fn run_query_and_respond(&self, user_id: i64, chat_id: ChatId, thread_id: Option<ThreadId>, query: Query) -> Result<()> {
        let default_dir = self.access.default_directory().ok_or(TelegramError::NoApprovedDirectory)?;
        let state = self.chat_states.get_or_init(user_id, &default_dir).await;
        let directory = state.directory.clone();

        let sink = Arc::new(TelegramSink::new(self.bot.clone(), chat_id, thread_id));
        let renderer = Arc::new(Mutex::new(
            ProgressRenderer::start(sink, bridge_core::config::edit_interval(), bridge_core::config::max_msg_length()).await?,
        ));

        let (event_tx, mut event_rx) = mpsc::unbounded_channel::<ActorEvent>();
        let render_task_renderer = renderer.clone();
        let render_task = tokio::spawn(async move {
            while let Some(event) = event_rx.recv().await {
                let mut r = render_task_renderer.lock().await;
                match event {
                    ActorEvent::Text(text) => r.on_text(&text),
                    ActorEvent::ToolUse { name, input } => r.on_tool_use(&name, Some(input.to_string())),
                    ActorEvent::ToolResult(result) => r.on_tool_result(&result),
                    ActorEvent::Thinking(_) => r.on_thinking(),
                }
                r.update().await;
            }
        });

        let on_stream: StreamCallback = Arc::new(move |event| {
            let _ = event_tx.send(event);
        });

        let req = ConnectRequest {
            user_id,
            directory: directory.clone(),
            session_id: state.session_id.clone(),
            model: state.model.clone(),
            betas: state.betas.clone(),
            approved_directory: self.access.default_directory(),
            force_new: false,
        };

        let result = self.manager.submit(req, query, on_stream).await;
        let _ = render_task.await;

        let mut r = renderer.lock().await;
        r.finalize().await;
        drop(r);

        match result {
            Ok(query_result) => {
                if let Some(session_id) = &query_result.session_id {
                    self.chat_states.set_session(user_id, Some(session_id.clone())).await;
                    self.manager.update_session_id(user_id, &directory, session_id).await?;
                }
                self.bot.send_message(chat_id, query_result.response_text).await?;
            }
            Err(e) => {
                self.bot.send_message(chat_id, format!("Error: {e}")).await?;
            }
        }
        Ok(())
    }

    /// Session-pick / directory-browse inline-keyboard callbacks. Edits
    /// the originating message in place.
    pub async fn handle_callback(&self, query: &CallbackQuery) -> Result<()> {
        let Some(data) = &query.data else { return Ok(()) };
        let Some(payload) = CallbackPayload::parse(data) else { return Ok(()) };
        let Some(message) = query.regular_message() else { return Ok(()) };
        let chat_id = message.chat.id;
        let message_id = message.id;
        let user_id = query.from.id.0 as i64;

        self.bot.answer_callback_query(query.id.clone()).await?;

        match payload {
            CallbackPayload::Nav(subpath) => {
                self.chat_states.set_browse_subpath(user_id, subpath.clone()).await;
                let Some(root) = self.access.default_directory() else { return Ok(()) };
                let keyboard = directory_browser_keyboard(&root, &subpath);
                self.bot
                    .edit_message_reply_markup(chat_id, message_id)
                    .reply_markup(keyboard)
                    .await?;
            }
            CallbackPayload::Sel(subpath) => {
                let Some(root) = self.access.default_directory() else { return Ok(()) };
                let directory = root.join(&subpath);
                if !self.access.is_within_approved(&directory) {
                    return Err(TelegramError::DirectoryNotApproved(directory.display().to_string()));
                }
                self.chat_states.set_directory(user_id, directory.clone()).await;
                self.bot
                    .edit_message_text(chat_id, message_id, format!("Directory set to {}", directory.display()))
                    .await?;
            }
            CallbackPayload::Session(session_id) => {
                self.chat_states.set_session(user_id, session_id.clone()).await;
                let label = session_id.as_deref().unwrap_or("a new session");
                self.bot.edit_message_text(chat_id, message_id, format!("Resuming {label}")).await?;
            }
            CallbackPayload::Skill(name) => {
                self.bot.edit_message_text(chat_id, message_id, format!("Skill set to {name}")).await?;
            }
            CallbackPayload::Model { name, extended_1m } => {
                let betas = extended_1m.then(|| vec!["context-1m".to_string()]);
                self.chat_states.set_model(user_id, name.clone(), betas).await;
                self.bot.edit_message_text(chat_id, message_id, format!("Model set to {name}")).await?;
            }
        }
        Ok(())
    }

    /// Posts the directory browser as a fresh message.
    pub async fn send_directory_browser(&self, chat_id: ChatId) -> Result<()> {
        let Some(root) = self.access.default_directory() else { return Err(TelegramError::NoApprovedDirectory) };
        let keyboard = directory_browser_keyboard(&root, &PathBuf::new());
        self.bot
            .send_message(chat_id, "Pick a directory:")
            .reply_markup(keyboard)
            .await?;
        Ok(())
    }

    /// Posts the session picker as a fresh message.
    pub async fn send_session_picker(&self, chat_id: ChatId, directory: &std::path::Path) -> Result<()> {
        let sessions = self.session_resolver.list_sessions(Some(directory), 10);
        let keyboard = session_picker_keyboard(&sessions);
        self.bot
            .send_message(chat_id, "Pick a session:")
            .reply_markup(keyboard)
            .await?;
        Ok(())
    }
}

fn spawn_group_drain(orchestrator: Arc<Orchestrator>, mut rx: mpsc::UnboundedReceiver<Vec<CollectedAttachment>>) {
    tokio::spawn(async move {
        while let Some(group) = rx.recv().await {
            orchestrator.process_collected_group(group).await;
        }
    });
}
