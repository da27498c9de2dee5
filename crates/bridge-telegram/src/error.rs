//! Error types for the Telegram adapter.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("TELEGRAM_BOT_TOKEN not set")]
    NoToken,

    #[error("failed to start bot: {0}")]
    BotStartFailed(String),

    #[error("failed to register webhook: {0}")]
    WebhookFailed(String),

    #[error("ngrok error: {0}")]
    NgrokError(String),

    #[error("ngrok not found. Install from https://ngrok.com/download")]
    NgrokNotFound,

    #[error("NGROK_AUTHTOKEN not set")]
    NgrokNoAuthToken,

    #[error("user {0} is not on the allowed list")]
    NotAuthorized(i64),

    #[error("directory {0} is outside every approved root")]
    DirectoryNotApproved(String),

    #[error("no approved working-directory root is configured")]
    NoApprovedDirectory,

    #[error(transparent)]
    Manager(#[from] bridge_manager::ManagerError),

    #[error(transparent)]
    Attachment(#[from] bridge_attachments::UnsupportedAttachmentError),

    #[error(transparent)]
    Sink(#[from] bridge_progress::SinkError),

    #[error(transparent)]
    Teloxide(#[from] teloxide::RequestError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, TelegramError>;
