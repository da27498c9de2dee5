//! Stream Handler: flattens the agent SDK's heterogeneous message stream
//! into one tagged `StreamEvent` so downstream consumers never switch on
//! runtime message class.

use std::collections::HashMap;

use bridge_agent_sdk::{AssistantBlock, SdkMessage};

/// The flattened kind of a classified SDK message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEventKind {
    Text,
    Thinking,
    ToolUse,
    ToolResult,
    Result,
    Unknown,
}

/// One classified SDK message.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StreamEvent {
    pub kind: Option<StreamEventKind>,
    pub content: String,
    pub tool_name: Option<String>,
    pub tool_input: Option<HashMap<String, serde_json::Value>>,
    pub session_id: Option<String>,
    pub cost: Option<f64>,
    /// Whether the underlying tool-use block was a partial/delta chunk
    /// rather than a complete block; the actor uses this to decide whether
    /// to count a turn.
    pub is_partial: bool,
}

impl StreamEvent {
    fn unknown() -> Self {
        Self { kind: Some(StreamEventKind::Unknown), ..Default::default() }
    }
}

/// Classify one raw SDK message. Pure function: no I/O, no mutable state.
pub fn classify(message: &SdkMessage) -> StreamEvent {
    match message {
        SdkMessage::Result { result, session_id, total_cost_usd } => StreamEvent {
            kind: Some(StreamEventKind::Result),
            content: result.clone(),
            session_id: Some(session_id.clone()),
            cost: *total_cost_usd,
            ..Default::default()
        },
        SdkMessage::User { content } => {
            if content.is_empty() {
                StreamEvent::unknown()
            } else {
                StreamEvent {
                    kind: Some(StreamEventKind::ToolResult),
                    content: content.clone(),
                    ..Default::default()
                }
            }
        }
        SdkMessage::Assistant { blocks } => classify_assistant(blocks),
        SdkMessage::ControlResponse { .. } | SdkMessage::Other => StreamEvent::unknown(),
    }
}

fn classify_assistant(blocks: &[AssistantBlock]) -> StreamEvent {
    if let [AssistantBlock::Thinking { text }] = blocks {
        return StreamEvent {
            kind: Some(StreamEventKind::Thinking),
            content: text.clone(),
            ..Default::default()
        };
    }
    if let [AssistantBlock::ToolUse { name, input, is_partial }] = blocks {
        return StreamEvent {
            kind: Some(StreamEventKind::ToolUse),
            tool_name: Some(name.clone()),
            tool_input: Some(input.clone()),
            is_partial: *is_partial,
            ..Default::default()
        };
    }
    let text: String = blocks
        .iter()
        .filter_map(|b| match b {
            AssistantBlock::Text { text } => Some(text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("");
    StreamEvent { kind: Some(StreamEventKind::Text), content: text, ..Default::default() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool_use(name: &str) -> AssistantBlock {
        AssistantBlock::ToolUse { name: name.to_string(), input: HashMap::new(), is_partial: false }
    }

    #[test]
    fn result_message_classifies_as_result() {
        let msg = SdkMessage::Result {
            result: "hi".into(),
            session_id: "sess-1".into(),
            total_cost_usd: Some(0.01),
        };
        let ev = classify(&msg);
        assert_eq!(ev.kind, Some(StreamEventKind::Result));
        assert_eq!(ev.content, "hi");
        assert_eq!(ev.session_id.as_deref(), Some("sess-1"));
        assert_eq!(ev.cost, Some(0.01));
    }

    #[test]
    fn single_thinking_block_classifies_as_thinking() {
        let msg = SdkMessage::Assistant {
            blocks: vec![AssistantBlock::Thinking { text: "hmm".into() }],
        };
        let ev = classify(&msg);
        assert_eq!(ev.kind, Some(StreamEventKind::Thinking));
        assert_eq!(ev.content, "hmm");
    }

    #[test]
    fn single_tool_use_block_classifies_as_tool_use() {
        let msg = SdkMessage::Assistant { blocks: vec![tool_use("Read")] };
        let ev = classify(&msg);
        assert_eq!(ev.kind, Some(StreamEventKind::ToolUse));
        assert_eq!(ev.tool_name.as_deref(), Some("Read"));
    }

    #[test]
    fn mixed_blocks_classify_as_text_concatenated_in_order() {
        let msg = SdkMessage::Assistant {
            blocks: vec![
                AssistantBlock::Text { text: "a".into() },
                AssistantBlock::Text { text: "b".into() },
            ],
        };
        let ev = classify(&msg);
        assert_eq!(ev.kind, Some(StreamEventKind::Text));
        assert_eq!(ev.content, "ab");
    }

    #[test]
    fn assistant_with_no_text_blocks_yields_empty_string() {
        let msg = SdkMessage::Assistant { blocks: vec![] };
        let ev = classify(&msg);
        assert_eq!(ev.kind, Some(StreamEventKind::Text));
        assert_eq!(ev.content, "");
    }

    #[test]
    fn non_empty_user_message_classifies_as_tool_result() {
        let msg = SdkMessage::User { content: "def main(): pass".into() };
        let ev = classify(&msg);
        assert_eq!(ev.kind, Some(StreamEventKind::ToolResult));
        assert_eq!(ev.content, "def main(): pass");
    }

    #[test]
    fn empty_user_message_classifies_as_unknown() {
        let msg = SdkMessage::User { content: String::new() };
        assert_eq!(classify(&msg).kind, Some(StreamEventKind::Unknown));
    }

    #[test]
    fn other_message_classifies_as_unknown() {
        assert_eq!(classify(&SdkMessage::Other).kind, Some(StreamEventKind::Unknown));
    }
}
