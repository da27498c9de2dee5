//! `BotSessionRecord`: the one-row-per-user shape persisted by the
//! Session Repository.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct BotSessionRecord {
    pub user_id: i64,
    pub session_id: Option<String>,
    pub directory: String,
    pub model: Option<String>,
    pub betas: Vec<String>,
    pub last_active: DateTime<Utc>,
}
