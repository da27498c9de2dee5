//! Content blocks: the typed elements of a multimodal user message.

use serde::{Deserialize, Serialize};

/// One typed element inside a multimodal user message, as understood by
/// the agent SDK's structured-prompt path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
    Image { source: ImageSource },
    Document { source: DocumentSource, title: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ImageSource {
    Base64 { media_type: String, data: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DocumentSource {
    Base64 { media_type: String, data: String },
    Text { media_type: String, data: String },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn image_base64(media_type: impl Into<String>, data: impl Into<String>) -> Self {
        ContentBlock::Image {
            source: ImageSource::Base64 {
                media_type: media_type.into(),
                data: data.into(),
            },
        }
    }

    pub fn pdf_document(title: impl Into<String>, data: impl Into<String>) -> Self {
        ContentBlock::Document {
            source: DocumentSource::Base64 {
                media_type: "application/pdf".to_string(),
                data: data.into(),
            },
            title: title.into(),
        }
    }

    pub fn text_document(title: impl Into<String>, data: impl Into<String>) -> Self {
        ContentBlock::Document {
            source: DocumentSource::Text {
                media_type: "text/plain".to_string(),
                data: data.into(),
            },
            title: title.into(),
        }
    }
}

/// The structured-prompt envelope the actor feeds to `query()`. Always
/// used, even for text-only prompts, to keep one code path.
#[derive(Debug, Clone, Serialize)]
pub struct UserMessageEnvelope {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub message: InnerUserMessage,
    pub parent_tool_use_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InnerUserMessage {
    pub role: &'static str,
    pub content: Vec<ContentBlock>,
}

impl UserMessageEnvelope {
    pub fn new(content: Vec<ContentBlock>) -> Self {
        Self {
            kind: "user",
            message: InnerUserMessage { role: "user", content },
            parent_tool_use_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_block_serializes_with_type_tag() {
        let block = ContentBlock::text("hello");
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["text"], "hello");
    }

    #[test]
    fn image_block_round_trips() {
        let block = ContentBlock::image_base64("image/png", "Zm9v");
        let json = serde_json::to_string(&block).unwrap();
        assert!(json.contains("\"media_type\":\"image/png\""));
    }

    #[test]
    fn envelope_wraps_content_in_user_message_shape() {
        let envelope = UserMessageEnvelope::new(vec![ContentBlock::text("hi")]);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["type"], "user");
        assert_eq!(json["message"]["role"], "user");
        assert!(json["message"]["content"].is_array());
    }
}
