//! The agent SDK's per-connection options record.
//!
//! Built by the Options Builder (`bridge-options`); consumed by
//! `AgentClient::connect`.

use std::sync::Arc;

/// Decision returned by a tool-use permission callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionDecision {
    Allow,
    Deny,
}

/// A tool-use permission callback: given a tool name and its input map (as
/// JSON), decide whether to allow the call. Boxed so it can close over an
/// approved-directory root and a security validator without the trait
/// needing generics.
pub type PermissionCallback =
    Arc<dyn Fn(&str, &serde_json::Value) -> PermissionDecision + Send + Sync>;

/// The options record passed to `AgentClient::connect`.
#[derive(Clone)]
pub struct AgentOptions {
    pub cwd: std::path::PathBuf,
    pub resume_session_id: Option<String>,
    pub model: Option<String>,
    pub betas: Vec<String>,
    /// Always "bypass" per the bridge's headless operating contract; kept
    /// as a field (rather than hardcoded at the call site) so a future
    /// caller can observe it without reaching into private state.
    pub permission_mode: &'static str,
    pub system_prompt: String,
    pub permission_callback: Option<PermissionCallback>,
}

impl std::fmt::Debug for AgentOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentOptions")
            .field("cwd", &self.cwd)
            .field("resume_session_id", &self.resume_session_id)
            .field("model", &self.model)
            .field("betas", &self.betas)
            .field("permission_mode", &self.permission_mode)
            .field("system_prompt", &self.system_prompt)
            .field("permission_callback", &self.permission_callback.is_some())
            .finish()
    }
}
