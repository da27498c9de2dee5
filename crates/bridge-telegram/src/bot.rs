//! Dispatch wiring: routes teloxide updates to the Orchestrator, and owns
//! the bot's startup/shutdown (polling or ngrok-backed webhook).

use std::path::PathBuf;
use std::sync::Arc;

use bridge_history::SessionResolver;
use bridge_manager::ClientManager;
use bridge_options::OptionsBuilder;
use bridge_store::SessionRepository;
use teloxide::dispatching::{Dispatcher, UpdateFilterExt};
use teloxide::prelude::*;
use teloxide::types::Update;
use teloxide::utils::command::BotCommands;

use crate::access::AccessControl;
use crate::error::{Result, TelegramError};
use crate::ngrok::NgrokTunnel;
use crate::orchestrator::Orchestrator;

#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "These commands are recognized before command passthrough:")]
enum Command {
    #[command(description = "welcome message")]
    Start,
    #[command(description = "show this help")]
    Help,
    #[command(description = "pick a working directory")]
    Directory,
    #[command(description = "pick a session to resume")]
    Sessions,
}

pub struct TelegramBot {
    bot: Bot,
    orchestrator: Arc<Orchestrator>,
}

impl TelegramBot {
    pub async fn new(state_dir: &std::path::Path) -> Result<Self> {
        let token = std::env::var("TELEGRAM_BOT_TOKEN").map_err(|_| TelegramError::NoToken)?;
        let bot = Bot::new(token);

        let access = AccessControl::from_env();

        let agent_config_dir = bridge_core::config::agent_config_dir();
        let options_builder = OptionsBuilder::from_agent_config_dir(
            &agent_config_dir,
            "You are Bridge, a mobile Telegram front-end for a coding agent.",
        );

        let db_path = state_dir.join("sessions.db");
        let session_repo =
            SessionRepository::open(&db_path).await.map_err(|e| TelegramError::BotStartFailed(e.to_string()))?;

        let manager = ClientManager::new(
            Orchestrator::client_factory(),
            options_builder,
            session_repo,
            SessionResolver::from_config(),
            bridge_core::config::idle_timeout(),
        );

        let orchestrator = Orchestrator::new(bot.clone(), manager, access, SessionResolver::from_config());

        Ok(Self { bot, orchestrator })
    }

    pub async fn get_me(&mut self) -> Result<String> {
        let me = self.bot.get_me().await?;
        Ok(me.username().to_string())
    }

    fn handler() -> teloxide::dispatching::UpdateHandler<teloxide::RequestError> {
        let command_branch = Update::filter_message()
            .filter_command::<Command>()
            .endpoint(handle_command);

        let text_branch = Update::filter_message()
            .filter(|msg: Message| msg.text().is_some())
            .endpoint(handle_text);

        let attachment_branch = Update::filter_message()
            .filter(|msg: Message| msg.photo().is_some() || msg.document().is_some())
            .endpoint(handle_attachment);

        let callback_branch = Update::filter_callback_query().endpoint(handle_callback);

        dptree::entry().branch(command_branch).branch(text_branch).branch(attachment_branch).branch(callback_branch)
    }

    pub async fn start_polling(self) -> Result<()> {
        Dispatcher::builder(self.bot, Self::handler())
            .dependencies(dptree::deps![self.orchestrator])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
        Ok(())
    }

    pub async fn start_webhook(self, port: u16) -> Result<()> {
        let tunnel = NgrokTunnel::start(port).await?;
        let url = format!("{}/webhook", tunnel.public_url()).parse().map_err(|e| TelegramError::WebhookFailed(format!("{e}")))?;
        let addr = ([0, 0, 0, 0], port).into();
        let listener = teloxide::update_listeners::webhooks::axum(self.bot.clone(), teloxide::update_listeners::webhooks::Options::new(addr, url))
            .await
            .map_err(|e| TelegramError::WebhookFailed(e.to_string()))?;

        Dispatcher::builder(self.bot, Self::handler())
            .dependencies(dptree::deps![self.orchestrator])
            .enable_ctrlc_handler()
            .build()
            .dispatch_with_listener(listener, teloxide::error_handlers::LoggingErrorHandler::with_custom_text("webhook listener error"))
            .await;
        Ok(())
    }
}

async fn handle_command(bot: Bot, msg: Message, cmd: Command, orchestrator: Arc<Orchestrator>) -> std::result::Result<(), teloxide::RequestError> {
    let Some(user) = msg.from() else { return Ok(()) };
    let user_id = user.id.0 as i64;
    if !orchestrator.access().is_allowed(user_id) {
        bot.send_message(msg.chat.id, "You are not authorized to use this bot.").await?;
        return Ok(());
    }

    let result = match cmd {
        Command::Start => {
            bot.send_message(msg.chat.id, "Welcome. Send a message to start a session, or /directory to pick a project.").await.map(|_| ())
        }
        Command::Help => bot.send_message(msg.chat.id, Command::descriptions().to_string()).await.map(|_| ()),
        Command::Directory => {
            let _ = orchestrator.send_directory_browser(msg.chat.id).await;
            Ok(())
        }
        Command::Sessions => {
            let directory = orchestrator.access().default_directory().unwrap_or_else(|| PathBuf::from("."));
            let _ = orchestrator.send_session_picker(msg.chat.id, &directory).await;
            Ok(())
        }
    };
    let _ = result;
    Ok(())
}

async fn handle_text(bot: Bot, msg: Message, orchestrator: Arc<Orchestrator>) -> std::result::Result<(), teloxide::RequestError> {
    let Some(user) = msg.from() else { return Ok(()) };
    let user_id = user.id.0 as i64;
    if !orchestrator.access().is_allowed(user_id) {
        bot.send_message(msg.chat.id, "You are not authorized to use this bot.").await?;
        return Ok(());
    }
    let Some(text) = msg.text() else { return Ok(()) };
    if let Err(e) = orchestrator.handle_text(user_id, msg.chat.id, msg.thread_id, text).await {
        tracing::warn!(error = %e, user_id, "handle_text failed");
    }
    Ok(())
}

async fn handle_attachment(bot: Bot, msg: Message, orchestrator: Arc<Orchestrator>) -> std::result::Result<(), teloxide::RequestError> {
    let Some(user) = msg.from() else { return Ok(()) };
    let user_id = user.id.0 as i64;
    if !orchestrator.access().is_allowed(user_id) {
        bot.send_message(msg.chat.id, "You are not authorized to use this bot.").await?;
        return Ok(());
    }
    if let Err(e) = orchestrator.handle_attachment(&bot, user_id, msg.chat.id, msg.thread_id, &msg).await {
        tracing::warn!(error = %e, user_id, "handle_attachment failed");
    }
    Ok(())
}

async fn handle_callback(query: CallbackQuery, orchestrator: Arc<Orchestrator>) -> std::result::Result<(), teloxide::RequestError> {
    let user_id = query.from.id.0 as i64;
    if !orchestrator.access().is_allowed(user_id) {
        return Ok(());
    }
    if let Err(e) = orchestrator.handle_callback(&query).await {
        tracing::warn!(error = %e, user_id, "handle_callback failed");
    }
    Ok(())
}
