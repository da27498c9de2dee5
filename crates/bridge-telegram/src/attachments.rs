//! Turns Telegram's `PhotoSize`/`Document` updates into `RawAttachment`s
//! and downloads their bytes, ahead of the Attachment Processor.

use bridge_attachments::RawAttachment;
use teloxide::prelude::Requester;
use teloxide::types::Message;
use teloxide::Bot;

use crate::error::Result;

/// One attachment extracted from an inbound message, still needing its
/// bytes downloaded.
struct PendingFile {
    file_id: String,
    filename: String,
    mime: Option<String>,
    is_photo: bool,
    media_group_id: Option<String>,
}

fn pending_files(message: &Message) -> Vec<PendingFile> {
    let media_group_id = message.media_group_id().map(str::to_string);

    if let Some(sizes) = message.photo() {
        // Telegram sends several resolutions; the last is the largest.
        let Some(largest) = sizes.last() else { return Vec::new() };
        return vec![PendingFile {
            file_id: largest.file.id.clone(),
            filename: format!("{}.jpg", largest.file.unique_id),
            mime: Some("image/jpeg".to_string()),
            is_photo: true,
            media_group_id,
        }];
    }

    if let Some(doc) = message.document() {
        return vec![PendingFile {
            file_id: doc.file.id.clone(),
            filename: doc.file_name.clone().unwrap_or_else(|| doc.file.unique_id.clone()),
            mime: doc.mime_type.as_ref().map(|m| m.essence_str().to_string()),
            is_photo: false,
            media_group_id,
        }];
    }

    Vec::new()
}

async fn download(bot: &Bot, file_id: &str) -> Result<Vec<u8>> {
    let file = bot.get_file(file_id).await?;
    let url = format!("https://api.telegram.org/file/bot{}/{}", bot.token(), file.path);
    let bytes = reqwest::get(url).await?.bytes().await?;
    Ok(bytes.to_vec())
}

/// Download every attachment on `message`, if any.
pub async fn extract_raw_attachments(bot: &Bot, message: &Message) -> Result<Vec<RawAttachment>> {
    let mut out = Vec::new();
    for pending in pending_files(message) {
        let bytes = download(bot, &pending.file_id).await?;
        out.push(RawAttachment {
            bytes,
            filename: pending.filename,
            mime: pending.mime,
            is_photo: pending.is_photo,
            media_group_id: pending.media_group_id,
        });
    }
    Ok(out)
}

/// `true` if this message is a media-group member (part of an "album").
pub fn media_group_id(message: &Message) -> Option<String> {
    message.media_group_id().map(str::to_string)
}
