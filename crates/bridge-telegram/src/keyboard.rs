//! Inline-keyboard payload shapes and builders for the directory browser,
//! session picker, skill picker and model picker.

use std::path::{Path, PathBuf};

use bridge_history::HistoryEntry;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

/// A decoded inline-keyboard callback payload.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackPayload {
    /// Descend into a subdirectory of the root currently being browsed.
    Nav(PathBuf),
    /// Select the currently-browsed directory as the active one.
    Sel(PathBuf),
    /// Resume a prior session, or `__new__` to start fresh.
    Session(Option<String>),
    /// Apply a named skill/preset.
    Skill(String),
    /// Switch model, optionally requesting the 1M-context beta.
    Model { name: String, extended_1m: bool },
}

const NEW_SESSION_TOKEN: &str = "__new__";

impl CallbackPayload {
    pub fn parse(raw: &str) -> Option<Self> {
        let (tag, rest) = raw.split_once(':')?;
        match tag {
            "nav" => Some(Self::Nav(PathBuf::from(rest))),
            "sel" => Some(Self::Sel(PathBuf::from(rest))),
            "session" => {
                Some(Self::Session(if rest == NEW_SESSION_TOKEN { None } else { Some(rest.to_string()) }))
            }
            "skill" => Some(Self::Skill(rest.to_string())),
            "model" => {
                let (name, extended) = match rest.split_once(':') {
                    Some((name, "1m")) => (name, true),
                    _ => (rest, false),
                };
                Some(Self::Model { name: name.to_string(), extended_1m: extended })
            }
            _ => None,
        }
    }

    pub fn encode(&self) -> String {
        match self {
            Self::Nav(path) => format!("nav:{}", path.display()),
            Self::Sel(path) => format!("sel:{}", path.display()),
            Self::Session(Some(id)) => format!("session:{id}"),
            Self::Session(None) => format!("session:{NEW_SESSION_TOKEN}"),
            Self::Skill(name) => format!("skill:{name}"),
            Self::Model { name, extended_1m: true } => format!("model:{name}:1m"),
            Self::Model { name, extended_1m: false } => format!("model:{name}"),
        }
    }
}

/// One page of a directory browser rooted at `root`, currently showing
/// `subpath` (relative to `root`). Subdirectories become `nav:` buttons;
/// "Use this directory" becomes a `sel:` button.
pub fn directory_browser_keyboard(root: &Path, subpath: &Path) -> InlineKeyboardMarkup {
    let current = root.join(subpath);
    let mut rows = Vec::new();

    let mut entries: Vec<_> = std::fs::read_dir(&current)
        .into_iter()
        .flatten()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .filter(|e| !e.file_name().to_string_lossy().starts_with('.'))
        .collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let name = entry.file_name().to_string_lossy().to_string();
        let child_subpath = subpath.join(&name);
        rows.push(vec![InlineKeyboardButton::callback(
            format!("\u{1F4C1} {name}"),
            CallbackPayload::Nav(child_subpath).encode(),
        )]);
    }

    let mut controls = vec![InlineKeyboardButton::callback(
        "\u{2705} Use this directory",
        CallbackPayload::Sel(subpath.to_path_buf()).encode(),
    )];
    if let Some(parent) = subpath.parent() {
        controls.push(InlineKeyboardButton::callback(
            "\u{2B06}\u{FE0F} Up",
            CallbackPayload::Nav(parent.to_path_buf()).encode(),
        ));
    }
    rows.push(controls);

    InlineKeyboardMarkup::new(rows)
}

/// One button per recent session, plus a "start new session" button.
pub fn session_picker_keyboard(sessions: &[HistoryEntry]) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = sessions
        .iter()
        .map(|entry| {
            vec![InlineKeyboardButton::callback(
                entry.display.clone(),
                CallbackPayload::Session(Some(entry.session_id.clone())).encode(),
            )]
        })
        .collect();
    rows.push(vec![InlineKeyboardButton::callback("\u{2728} New session", CallbackPayload::Session(None).encode())]);
    InlineKeyboardMarkup::new(rows)
}
