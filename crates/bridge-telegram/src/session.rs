//! Per-user chat-session state: the directory and session the user is
//! currently bound to, plus the inline-keyboard browse cursor for the
//! directory-picker and session-picker callbacks.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;

/// What a user is currently bound to, plus transient picker UI state.
#[derive(Debug, Clone)]
pub struct UserChatState {
    pub directory: PathBuf,
    pub session_id: Option<String>,
    pub model: Option<String>,
    pub betas: Option<Vec<String>>,
    /// Subpath (relative to the approved root currently being browsed)
    /// shown by the directory-picker's `nav:`/`sel:` callbacks.
    pub browse_subpath: PathBuf,
}

impl UserChatState {
    fn new(directory: PathBuf) -> Self {
        Self { directory, session_id: None, model: None, betas: None, browse_subpath: PathBuf::new() }
    }
}

/// `user_id -> UserChatState`, shared across the dispatcher's handlers.
#[derive(Clone, Default)]
pub struct ChatStateStore {
    inner: Arc<RwLock<HashMap<i64, UserChatState>>>,
}

impl ChatStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The user's current state, creating it bound to `default_directory`
    /// on first contact.
    pub async fn get_or_init(&self, user_id: i64, default_directory: &Path) -> UserChatState {
        let mut map = self.inner.write().await;
        map.entry(user_id).or_insert_with(|| UserChatState::new(default_directory.to_path_buf())).clone()
    }

    pub async fn set_directory(&self, user_id: i64, directory: PathBuf) {
        let mut map = self.inner.write().await;
        let entry = map.entry(user_id).or_insert_with(|| UserChatState::new(directory.clone()));
        entry.directory = directory;
        entry.session_id = None;
        entry.browse_subpath = PathBuf::new();
    }

    pub async fn set_session(&self, user_id: i64, session_id: Option<String>) {
        if let Some(entry) = self.inner.write().await.get_mut(&user_id) {
            entry.session_id = session_id;
        }
    }

    pub async fn set_model(&self, user_id: i64, model: String, betas: Option<Vec<String>>) {
        if let Some(entry) = self.inner.write().await.get_mut(&user_id) {
            entry.model = Some(model);
            entry.betas = betas;
        }
    }

    pub async fn set_browse_subpath(&self, user_id: i64, subpath: PathBuf) {
        if let Some(entry) = self.inner.write().await.get_mut(&user_id) {
            entry.browse_subpath = subpath;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_or_init_binds_the_default_directory_once() {
        let store = ChatStateStore::new();
        let first = store.get_or_init(1, Path::new("/srv/a")).await;
        assert_eq!(first.directory, PathBuf::from("/srv/a"));

        store.set_directory(1, PathBuf::from("/srv/b")).await;
        let second = store.get_or_init(1, Path::new("/srv/a")).await;
        assert_eq!(second.directory, PathBuf::from("/srv/b"));
    }

    #[tokio::test]
    async fn changing_directory_clears_the_pinned_session() {
        let store = ChatStateStore::new();
        store.get_or_init(1, Path::new("/srv/a")).await;
        store.set_session(1, Some("sess-1".into())).await;
        store.set_directory(1, PathBuf::from("/srv/b")).await;
        let state = store.get_or_init(1, Path::new("/srv/a")).await;
        assert_eq!(state.session_id, None);
    }
}
