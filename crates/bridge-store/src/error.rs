//! Error type for the Session Repository.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to (de)serialize betas list: {0}")]
    BetasEncoding(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
