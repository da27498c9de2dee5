//! `RawAttachment`: one chat-platform attachment before classification.

/// One unprocessed attachment as downloaded from the chat platform.
#[derive(Debug, Clone)]
pub struct RawAttachment {
    pub bytes: Vec<u8>,
    pub filename: String,
    /// The chat platform's own MIME hint, if it reported one. Not trusted
    /// on its own — magic-byte sniffing is the final word for images and
    /// PDFs.
    pub mime: Option<String>,
    /// True for a chat "photo" (always treated as an image regardless of
    /// what sniffing says, falling back to JPEG if sniffing can't tell).
    pub is_photo: bool,
    /// The chat platform's media-group identifier, if this attachment
    /// belongs to an album.
    pub media_group_id: Option<String>,
}
