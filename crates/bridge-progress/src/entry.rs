//! `ActivityEntry`: one line of the live activity log.

/// The kind of one activity-log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Text,
    Tool,
    Thinking,
}

/// One line of the append-only activity log.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEntry {
    pub kind: ActivityKind,
    /// Free text for `kind == Text`; the "Thinking…"/"Thinking (done)"
    /// marker for `kind == Thinking`. Unused for `kind == Tool`.
    pub content: String,
    pub tool_name: Option<String>,
    pub tool_detail: Option<String>,
    pub tool_result: Option<String>,
    pub is_running: bool,
}

impl ActivityEntry {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: ActivityKind::Text,
            content: content.into(),
            tool_name: None,
            tool_detail: None,
            tool_result: None,
            is_running: false,
        }
    }

    pub fn tool(name: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            kind: ActivityKind::Tool,
            content: String::new(),
            tool_name: Some(name.into()),
            tool_detail: detail,
            tool_result: None,
            is_running: true,
        }
    }

    pub fn thinking() -> Self {
        Self {
            kind: ActivityKind::Thinking,
            content: String::new(),
            tool_name: None,
            tool_detail: None,
            tool_result: None,
            is_running: true,
        }
    }

    /// Close a still-running entry: mark it finished and, for `Thinking`
    /// entries, freeze its displayed content.
    pub fn close(&mut self) {
        self.is_running = false;
        if self.kind == ActivityKind::Thinking {
            self.content = "Thinking (done)".to_string();
        }
    }
}
