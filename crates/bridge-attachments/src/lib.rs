//! Attachment Processor: turns chat attachments into SDK content blocks,
//! and buffers "media group" albums before they're processed.

pub mod error;
pub mod group;
pub mod input;
pub mod processor;

pub use error::{Result, UnsupportedAttachmentError};
pub use group::MediaGroupCollector;
pub use input::RawAttachment;
pub use processor::process;
