//! Session Resolver: reads the agent CLI's on-disk session history so bot
//! sessions and CLI sessions stay mutually resumable.
//!
//! The history file is authoritative and owned by the agent CLI — this
//! crate never writes to it.

pub mod entry;
pub mod resolver;

pub use entry::{HistoryEntry, Role, TranscriptMessage};
pub use resolver::SessionResolver;
