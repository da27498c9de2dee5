//! `Query`, `Attachment` and `QueryResult`: the units of work the actor
//! exchanges with an `AgentClient`.

use crate::content::ContentBlock;

/// One processed chat attachment, immutable once built by the Attachment
/// Processor.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub content_block: ContentBlock,
    pub filename: String,
    pub size_bytes: usize,
    pub media_type: String,
}

/// One unit of work submitted to a `UserClientActor`.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub text: Option<String>,
    pub attachments: Vec<Attachment>,
}

impl Query {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: Some(text.into()), attachments: Vec::new() }
    }

    pub fn with_attachments(text: Option<String>, attachments: Vec<Attachment>) -> Self {
        Self { text, attachments }
    }

    /// Render to content blocks in SDK order: the text block (if present)
    /// followed by each attachment's block, in the given order.
    pub fn to_content_blocks(&self) -> Vec<ContentBlock> {
        let mut blocks = Vec::with_capacity(self.attachments.len() + 1);
        if let Some(text) = &self.text {
            blocks.push(ContentBlock::text(text.clone()));
        }
        blocks.extend(self.attachments.iter().map(|a| a.content_block.clone()));
        blocks
    }
}

/// One completed query's result.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub response_text: String,
    pub session_id: Option<String>,
    pub cost: Option<f64>,
    pub num_turns: u32,
    pub duration_ms: u64,
}
