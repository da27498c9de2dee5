//! Tool-use permission callback: rejects calls that reach outside the
//! approved directory or match known dangerous shell patterns.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bridge_agent_sdk::{PermissionCallback, PermissionDecision};

/// Shell fragments that are rejected outright regardless of working
/// directory, because they can affect state outside any single path.
const DANGEROUS_SHELL_PATTERNS: &[&str] =
    &["rm -rf /", "mkfs", ":(){ :|:& };:", "> /dev/sda", "dd if=/dev/zero"];

/// Build a permission callback bound to `approved_directory`. Any tool
/// input containing a `file_path`/`path`/`cwd`/`command` field is checked:
/// paths must canonicalize under the approved directory; shell-like
/// commands are scanned for the dangerous-pattern list.
pub fn build_permission_callback(approved_directory: PathBuf) -> PermissionCallback {
    Arc::new(move |_tool_name, input| {
        if let Some(obj) = input.as_object() {
            for key in ["file_path", "path", "cwd"] {
                if let Some(path_str) = obj.get(key).and_then(|v| v.as_str()) {
                    if !path_is_within(Path::new(path_str), &approved_directory) {
                        return PermissionDecision::Deny;
                    }
                }
            }
            if let Some(command) = obj.get("command").and_then(|v| v.as_str()) {
                if contains_dangerous_pattern(command) {
                    return PermissionDecision::Deny;
                }
            }
        }
        PermissionDecision::Allow
    })
}

fn path_is_within(candidate: &Path, root: &Path) -> bool {
    let joined = if candidate.is_absolute() { candidate.to_path_buf() } else { root.join(candidate) };
    let resolved = std::fs::canonicalize(&joined).unwrap_or(joined);
    let root_resolved = std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    resolved.starts_with(&root_resolved)
}

fn contains_dangerous_pattern(command: &str) -> bool {
    DANGEROUS_SHELL_PATTERNS.iter().any(|pattern| command.contains(pattern))
}
