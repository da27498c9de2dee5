//! Shared configuration for the bridge workspace.
//!
//! Resolves the bridge's own state directory, the agent CLI's config
//! directory (where `history.jsonl` and per-project transcripts live), and
//! the handful of tunable timeouts the core components read from the
//! environment.

use std::path::PathBuf;
use std::time::Duration;

/// Environment variable for a custom bridge state directory.
const STATE_DIR_ENV: &str = "BRIDGE_STATE_DIR";

/// Default state directory name under home.
const DEFAULT_STATE_DIR: &str = ".bridge";

/// Environment variable for the agent CLI's own config directory.
const AGENT_CONFIG_DIR_ENV: &str = "BRIDGE_AGENT_CONFIG_DIR";

/// Default agent CLI config directory name under home.
const DEFAULT_AGENT_CONFIG_DIR: &str = ".agent";

const IDLE_TIMEOUT_SECS_ENV: &str = "BRIDGE_IDLE_TIMEOUT_SECS";
const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 3600;

const EDIT_INTERVAL_SECS_ENV: &str = "BRIDGE_EDIT_INTERVAL_SECS";
const DEFAULT_EDIT_INTERVAL_SECS: f64 = 2.0;

const MAX_MSG_LENGTH_ENV: &str = "BRIDGE_MAX_MSG_LENGTH";
const DEFAULT_MAX_MSG_LENGTH: usize = 4000;

const MEDIA_GROUP_TIMEOUT_SECS_ENV: &str = "BRIDGE_MEDIA_GROUP_TIMEOUT_SECS";
const DEFAULT_MEDIA_GROUP_TIMEOUT_SECS: f64 = 1.0;

const GC_HORIZON_HOURS_ENV: &str = "BRIDGE_GC_HORIZON_HOURS";
const DEFAULT_GC_HORIZON_HOURS: i64 = 24;

/// Get the bridge's own state directory.
///
/// Resolution order:
/// 1. `BRIDGE_STATE_DIR` environment variable if set.
/// 2. `~/.bridge` if a home directory is available.
/// 3. `.bridge` in the current directory as a last resort.
pub fn state_dir() -> PathBuf {
    std::env::var(STATE_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(DEFAULT_STATE_DIR))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
        })
}

/// Get the agent CLI's config directory (where `history.jsonl` lives).
pub fn agent_config_dir() -> PathBuf {
    std::env::var(AGENT_CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(DEFAULT_AGENT_CONFIG_DIR))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_AGENT_CONFIG_DIR))
        })
}

/// Path to the agent CLI's history file.
pub fn history_file() -> PathBuf {
    agent_config_dir().join("history.jsonl")
}

/// Per-project transcripts directory for a given project directory.
///
/// The agent CLI keys transcripts by a sanitized form of the absolute
/// project path, one directory per project under `projects/`.
pub fn transcripts_dir(project_dir: &std::path::Path) -> PathBuf {
    let key = sanitize_project_key(project_dir);
    agent_config_dir().join("projects").join(key)
}

fn sanitize_project_key(project_dir: &std::path::Path) -> String {
    project_dir
        .to_string_lossy()
        .chars()
        .map(|c| if c == '/' || c == '\\' { '-' } else { c })
        .collect()
}

/// The bridge's own SQLite session database path.
pub fn session_db_path() -> PathBuf {
    state_dir().join("sessions.db")
}

/// The `.env` file checked before any other environment loading.
pub fn env_file() -> PathBuf {
    state_dir().join(".env")
}

/// Ensure the bridge state directory exists, creating it if necessary.
pub fn ensure_state_dir() -> std::io::Result<()> {
    let dir = state_dir();
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }
    Ok(())
}

/// Idle timeout before an inactive Actor disconnects (default 3600s).
pub fn idle_timeout() -> Duration {
    Duration::from_secs(env_u64(IDLE_TIMEOUT_SECS_ENV, DEFAULT_IDLE_TIMEOUT_SECS))
}

/// Minimum spacing between progress-renderer edits (default 2.0s).
pub fn edit_interval() -> Duration {
    Duration::from_secs_f64(env_f64(EDIT_INTERVAL_SECS_ENV, DEFAULT_EDIT_INTERVAL_SECS))
}

/// Maximum rendered chat-message length before rollover (default 4000).
pub fn max_msg_length() -> usize {
    env_usize(MAX_MSG_LENGTH_ENV, DEFAULT_MAX_MSG_LENGTH)
}

/// How long the media-group collector waits after the last item before
/// yielding a buffered album (default 1.0s).
pub fn media_group_timeout() -> Duration {
    Duration::from_secs_f64(env_f64(
        MEDIA_GROUP_TIMEOUT_SECS_ENV,
        DEFAULT_MEDIA_GROUP_TIMEOUT_SECS,
    ))
}

/// Session-repository GC horizon in hours (default 24).
pub fn gc_horizon_hours() -> i64 {
    std::env::var(GC_HORIZON_HOURS_ENV)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_GC_HORIZON_HOURS)
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_f64(key: &str, default: f64) -> f64 {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_dir_falls_back_to_dotdir_name() {
        let dir = state_dir();
        assert!(dir.is_absolute() || dir.ends_with(".bridge"));
    }

    #[test]
    fn history_file_lives_under_agent_config_dir() {
        let file = history_file();
        assert!(file.ends_with("history.jsonl"));
    }

    #[test]
    fn transcripts_dir_sanitizes_path_separators() {
        let dir = transcripts_dir(std::path::Path::new("/w/my-proj"));
        let key = dir.file_name().unwrap().to_string_lossy().to_string();
        assert!(!key.contains('/'));
        assert!(key.contains("-w-my-proj"));
    }

    #[test]
    fn defaults_match_documented_values() {
        std::env::remove_var(IDLE_TIMEOUT_SECS_ENV);
        std::env::remove_var(MAX_MSG_LENGTH_ENV);
        assert_eq!(idle_timeout(), Duration::from_secs(3600));
        assert_eq!(max_msg_length(), 4000);
    }
}
