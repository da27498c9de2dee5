//! Telegram adapter: the chat platform interface and the Orchestrator
//! that drive a local coding agent remotely from a Telegram chat.
//!
//! # Environment
//!
//! Required: `TELEGRAM_BOT_TOKEN`, `BRIDGE_ALLOWED_USER_IDS`,
//! `BRIDGE_APPROVED_DIRS`. Optional tunables are listed in
//! `bridge_core::config`.
//!
//! # Example
//!
//! ```no_run
//! use bridge_telegram::TelegramBot;
//! use std::path::Path;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut bot = TelegramBot::new(Path::new("/path/to/state")).await?;
//! bot.start_polling().await?;
//! # Ok(())
//! # }
//! ```

pub mod access;
pub mod attachments;
pub mod bot;
pub mod error;
pub mod keyboard;
pub mod ngrok;
pub mod orchestrator;
pub mod session;
pub mod sink;

pub use access::AccessControl;
pub use bot::TelegramBot;
pub use error::{Result, TelegramError};
pub use ngrok::NgrokTunnel;
pub use orchestrator::Orchestrator;
pub use session::{ChatStateStore, UserChatState};
