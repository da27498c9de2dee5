//! The CLI-user settings file: read once per builder lifetime and cached.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

/// Subset of the CLI-user settings file the Options Builder cares about.
/// Unknown fields are ignored so a richer settings file (the CLI's own
/// schema) doesn't break parsing here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CliUserSettings {
    pub model: Option<String>,
    #[serde(default)]
    pub betas: Vec<String>,
}

/// Read the CLI-user settings file at `path`. A missing or malformed file
/// is treated as empty settings with a logged warning, never a fatal error.
pub fn load_settings(path: &Path) -> CliUserSettings {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return CliUserSettings::default(),
        Err(e) => {
            warn!(error = %e, path = %path.display(), "failed to read CLI settings file");
            return CliUserSettings::default();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(error = %e, path = %path.display(), "malformed CLI settings file, treating as empty");
        CliUserSettings::default()
    })
}

/// Default settings file path under the agent CLI's config directory.
pub fn default_settings_path(agent_config_dir: &Path) -> PathBuf {
    agent_config_dir.join("settings.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_empty_settings() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = load_settings(&tmp.path().join("absent.json"));
        assert_eq!(settings.model, None);
    }

    #[test]
    fn malformed_file_yields_empty_settings() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();
        let settings = load_settings(&path);
        assert_eq!(settings.model, None);
    }

    #[test]
    fn valid_file_parses_model_and_betas() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.json");
        std::fs::write(&path, r#"{"model": "opus", "betas": ["beta-1"]}"#).unwrap();
        let settings = load_settings(&path);
        assert_eq!(settings.model.as_deref(), Some("opus"));
        assert_eq!(settings.betas, vec!["beta-1".to_string()]);
    }
}
