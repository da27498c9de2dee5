//! Options Builder: merges explicit arguments, the cached CLI-user
//! settings, and SDK defaults into one `AgentOptions` record per query.

use std::path::{Path, PathBuf};

use bridge_agent_sdk::AgentOptions;

use crate::error::{OptionsError, Result};
use crate::settings::{default_settings_path, load_settings, CliUserSettings};
use crate::validator::build_permission_callback;

/// Short mobile-display hint appended to the CLI's default system-prompt
/// preset. Never replaces the preset itself.
const MOBILE_DISPLAY_HINT: &str =
    "\n\nYou are being used from a mobile chat client: keep replies concise and avoid wide tables.";

/// Per-query inputs the caller supplies explicitly.
#[derive(Debug, Clone, Default)]
pub struct OptionsInput {
    pub cwd: PathBuf,
    pub session_id: Option<String>,
    pub model: Option<String>,
    pub betas: Option<Vec<String>>,
    pub approved_directory: Option<PathBuf>,
}

/// Builds `AgentOptions` records, caching the CLI-user settings file across
/// the builder's lifetime (read once, not once per query).
pub struct OptionsBuilder {
    settings: CliUserSettings,
    base_system_prompt: String,
}

impl OptionsBuilder {
    /// Read and cache the CLI-user settings file at `settings_path`, using
    /// `base_system_prompt` as the CLI's default preset to preserve.
    pub fn new(settings_path: &Path, base_system_prompt: impl Into<String>) -> Self {
        Self { settings: load_settings(settings_path), base_system_prompt: base_system_prompt.into() }
    }

    /// Construct a builder rooted at the agent CLI's config directory.
    pub fn from_agent_config_dir(agent_config_dir: &Path, base_system_prompt: impl Into<String>) -> Self {
        Self::new(&default_settings_path(agent_config_dir), base_system_prompt)
    }

    /// Build one `AgentOptions` record for a query.
    ///
    /// Precedence: explicit argument > CLI-user settings > SDK defaults.
    /// Always emits `permission_mode = "bypass"`; never touches the CLI's
    /// native tool allow/deny lists.
    pub fn build(&self, input: OptionsInput) -> Result<AgentOptions> {
        if input.cwd.as_os_str().is_empty() {
            return Err(OptionsError::RejectedField {
                field: "cwd".to_string(),
                reason: "cwd is required".to_string(),
            });
        }

        let model = input.model.or_else(|| self.settings.model.clone());
        let betas = input.betas.unwrap_or_else(|| self.settings.betas.clone());
        let system_prompt = format!("{}{}", self.base_system_prompt, MOBILE_DISPLAY_HINT);

        let permission_callback = input.approved_directory.map(build_permission_callback);

        Ok(AgentOptions {
            cwd: input.cwd,
            resume_session_id: input.session_id,
            model,
            betas,
            permission_mode: "bypass",
            system_prompt,
            permission_callback,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_model_wins_over_settings() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("settings.json"), r#"{"model": "from-settings"}"#).unwrap();
        let builder = OptionsBuilder::from_agent_config_dir(tmp.path(), "preset");
        let options = builder
            .build(OptionsInput {
                cwd: "/w/p".into(),
                model: Some("explicit-model".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(options.model.as_deref(), Some("explicit-model"));
    }

    #[test]
    fn falls_back_to_settings_model_when_omitted() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("settings.json"), r#"{"model": "from-settings"}"#).unwrap();
        let builder = OptionsBuilder::from_agent_config_dir(tmp.path(), "preset");
        let options = builder.build(OptionsInput { cwd: "/w/p".into(), ..Default::default() }).unwrap();
        assert_eq!(options.model.as_deref(), Some("from-settings"));
    }

    #[test]
    fn system_prompt_preserves_preset_and_appends_hint() {
        let tmp = tempfile::tempdir().unwrap();
        let builder = OptionsBuilder::from_agent_config_dir(tmp.path(), "BASE PRESET");
        let options = builder.build(OptionsInput { cwd: "/w/p".into(), ..Default::default() }).unwrap();
        assert!(options.system_prompt.starts_with("BASE PRESET"));
        assert!(options.system_prompt.contains("mobile chat client"));
    }

    #[test]
    fn permission_mode_is_always_bypass() {
        let tmp = tempfile::tempdir().unwrap();
        let builder = OptionsBuilder::from_agent_config_dir(tmp.path(), "preset");
        let options = builder.build(OptionsInput { cwd: "/w/p".into(), ..Default::default() }).unwrap();
        assert_eq!(options.permission_mode, "bypass");
    }

    #[test]
    fn permission_callback_present_only_with_approved_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let builder = OptionsBuilder::from_agent_config_dir(tmp.path(), "preset");
        let without = builder.build(OptionsInput { cwd: "/w/p".into(), ..Default::default() }).unwrap();
        assert!(without.permission_callback.is_none());

        let with = builder
            .build(OptionsInput {
                cwd: "/w/p".into(),
                approved_directory: Some(tmp.path().to_path_buf()),
                ..Default::default()
            })
            .unwrap();
        assert!(with.permission_callback.is_some());
    }

    #[test]
    fn empty_cwd_is_a_fatal_build_error() {
        let tmp = tempfile::tempdir().unwrap();
        let builder = OptionsBuilder::from_agent_config_dir(tmp.path(), "preset");
        let result = builder.build(OptionsInput::default());
        assert!(matches!(result, Err(OptionsError::RejectedField { .. })));
    }
}
