//! Converts one `RawAttachment` into an SDK-native `Attachment` per the
//! photo/document classification algorithm.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bridge_agent_sdk::{Attachment, ContentBlock};
use bridge_core::content_type::{is_known_text_extension, is_pdf, sniff_image_format};

use crate::error::{Result, UnsupportedAttachmentError};
use crate::input::RawAttachment;

/// Classify and convert one chat attachment. Pure, apart from the base64
/// encoding, which is unavoidable work rather than I/O.
pub fn process(raw: &RawAttachment) -> Result<Attachment> {
    if raw.is_photo {
        return Ok(image_attachment(raw, sniff_image_format(&raw.bytes)));
    }
    document_attachment(raw)
}

fn image_attachment(raw: &RawAttachment, sniffed: Option<bridge_core::content_type::ImageFormat>) -> Attachment {
    let media_type = sniffed.map(|f| f.media_type()).unwrap_or("image/jpeg").to_string();
    let data = BASE64.encode(&raw.bytes);
    Attachment {
        content_block: ContentBlock::image_base64(media_type.clone(), data),
        filename: raw.filename.clone(),
        size_bytes: raw.bytes.len(),
        media_type,
    }
}

fn document_attachment(raw: &RawAttachment) -> Result<Attachment> {
    let mime_says_image = raw.mime.as_deref().map(|m| m.starts_with("image/")).unwrap_or(false);
    if mime_says_image || sniff_image_format(&raw.bytes).is_some() {
        return Ok(image_attachment(raw, sniff_image_format(&raw.bytes)));
    }

    let mime_says_pdf = raw.mime.as_deref() == Some("application/pdf");
    if mime_says_pdf || is_pdf(&raw.bytes) {
        let data = BASE64.encode(&raw.bytes);
        return Ok(Attachment {
            content_block: ContentBlock::pdf_document(raw.filename.clone(), data),
            filename: raw.filename.clone(),
            size_bytes: raw.bytes.len(),
            media_type: "application/pdf".to_string(),
        });
    }

    let mime_says_text = raw.mime.as_deref().map(|m| m.starts_with("text/")).unwrap_or(false);
    let extension_says_text = extension_of(&raw.filename).map(is_known_text_extension).unwrap_or(false);

    if mime_says_text || extension_says_text {
        return text_attachment(raw);
    }

    // Last resort: a strict UTF-8 decode succeeds for plenty of text files
    // chat platforms report no MIME for and whose extension isn't in the
    // known set.
    if std::str::from_utf8(&raw.bytes).is_ok() {
        return text_attachment(raw);
    }

    Err(UnsupportedAttachmentError {
        filename: raw.filename.clone(),
        mime: raw.mime.clone(),
    })
}

fn text_attachment(raw: &RawAttachment) -> Result<Attachment> {
    let text = std::str::from_utf8(&raw.bytes)
        .map_err(|_| UnsupportedAttachmentError { filename: raw.filename.clone(), mime: raw.mime.clone() })?;
    Ok(Attachment {
        content_block: ContentBlock::text_document(raw.filename.clone(), text.to_string()),
        filename: raw.filename.clone(),
        size_bytes: raw.bytes.len(),
        media_type: "text/plain".to_string(),
    })
}

fn extension_of(filename: &str) -> Option<&str> {
    filename.rsplit_once('.').map(|(_, ext)| ext)
}
