//! `HistoryEntry` and `TranscriptMessage`: the records parsed out of the
//! agent CLI's on-disk session index.

use serde::Deserialize;

/// One record from the agent CLI's `history.jsonl`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(default)]
    pub display: String,
    pub timestamp: i64,
    pub project: String,
}

/// One message from a session transcript file.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptMessage {
    pub role: Role,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// Raw shape of one transcript JSON line, before role normalization.
#[derive(Debug, Deserialize)]
pub(crate) struct RawTranscriptLine {
    pub role: String,
    #[serde(default)]
    pub text: String,
}

impl RawTranscriptLine {
    pub(crate) fn into_message(self) -> Option<TranscriptMessage> {
        let role = match self.role.as_str() {
            "user" => Role::User,
            "assistant" => Role::Assistant,
            _ => return None,
        };
        Some(TranscriptMessage { role, text: self.text })
    }
}
