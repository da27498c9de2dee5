//! The Attachment Processor's error type.

use thiserror::Error;

/// A chat attachment that could not be converted to a content block: not
/// an image, not a PDF, and not valid UTF-8 text. Surfaced to the user as
/// a single-line message; other attachments in the same group still
/// proceed.
#[derive(Debug, Error)]
#[error("unsupported attachment {filename:?} ({mime:?})")]
pub struct UnsupportedAttachmentError {
    pub filename: String,
    pub mime: Option<String>,
}

pub type Result<T> = std::result::Result<T, UnsupportedAttachmentError>;
