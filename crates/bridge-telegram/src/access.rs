//! `AccessControl`: who may talk to the bot, and which working-directory
//! roots it's allowed to open a session in.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

const ALLOWED_USER_IDS_ENV: &str = "BRIDGE_ALLOWED_USER_IDS";
const APPROVED_DIRS_ENV: &str = "BRIDGE_APPROVED_DIRS";

#[derive(Debug, Clone)]
pub struct AccessControl {
    allowed_user_ids: HashSet<i64>,
    approved_roots: Vec<PathBuf>,
}

impl AccessControl {
    /// Read `BRIDGE_ALLOWED_USER_IDS` (comma-separated) and
    /// `BRIDGE_APPROVED_DIRS` (`:`-separated, like `PATH`) from the
    /// environment.
    pub fn from_env() -> Self {
        let allowed_user_ids = std::env::var(ALLOWED_USER_IDS_ENV)
            .unwrap_or_default()
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        let approved_roots = std::env::var(APPROVED_DIRS_ENV)
            .unwrap_or_default()
            .split(':')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .collect();
        Self { allowed_user_ids, approved_roots }
    }

    pub fn is_allowed(&self, user_id: i64) -> bool {
        self.allowed_user_ids.contains(&user_id)
    }

    pub fn approved_roots(&self) -> &[PathBuf] {
        &self.approved_roots
    }

    /// The directory a freshly-seen user starts in: the first approved
    /// root, if any.
    pub fn default_directory(&self) -> Option<PathBuf> {
        self.approved_roots.first().cloned()
    }

    /// Whether `dir` is exactly one of, or nested under, an approved root.
    pub fn is_within_approved(&self, dir: &Path) -> bool {
        self.approved_roots.iter().any(|root| dir.starts_with(root))
    }
}
