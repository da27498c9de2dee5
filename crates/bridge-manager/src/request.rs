//! `ConnectRequest`: the arguments `ClientManager::get_or_connect` takes.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ConnectRequest {
    pub user_id: i64,
    pub directory: PathBuf,
    pub session_id: Option<String>,
    pub model: Option<String>,
    pub betas: Option<Vec<String>>,
    pub approved_directory: Option<PathBuf>,
    pub force_new: bool,
}

impl ConnectRequest {
    pub fn new(user_id: i64, directory: PathBuf) -> Self {
        Self {
            user_id,
            directory,
            session_id: None,
            model: None,
            betas: None,
            approved_directory: None,
            force_new: false,
        }
    }
}
