//! Session Repository: one-row-per-user bot session state, backed by
//! `sqlx`'s SQLite driver with transactional upsert and an indexed GC
//! sweep.

pub mod error;
pub mod record;
pub mod repository;

pub use error::{Result, StoreError};
pub use record::BotSessionRecord;
pub use repository::SessionRepository;
