//! Error type for the Client Manager.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("failed to start agent client for user {user_id}: {reason}")]
    StartFailed { user_id: i64, reason: String },

    #[error(transparent)]
    Options(#[from] bridge_options::OptionsError),

    #[error(transparent)]
    Store(#[from] bridge_store::StoreError),
}

pub type Result<T> = std::result::Result<T, ManagerError>;
