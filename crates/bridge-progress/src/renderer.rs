//! `ProgressRenderer`: turns a stream of activity events into one or more
//! persistent, throttled, rolling chat messages.

use std::sync::Arc;
use std::time::Duration;

use bridge_core::Redactor;
use tokio::time::Instant;

use crate::entry::{ActivityEntry, ActivityKind};
use crate::render::{header_line, render_message};
use crate::sink::{ChatMessageSink, MessageHandle, SinkError};

/// A chat message is frozen once it's no longer the tail of `messages`;
/// the renderer never edits anything but the tail.
pub struct ProgressRenderer {
    sink: Arc<dyn ChatMessageSink>,
    messages: Vec<MessageHandle>,
    log: Vec<ActivityEntry>,
    rendered_up_to: usize,
    start: Instant,
    last_edit: Option<Instant>,
    tick: u64,
    finalized: bool,
    redactor: Redactor,
    edit_interval: Duration,
    max_msg_length: usize,
}

impl ProgressRenderer {
    /// Post the initial "Working…" message and construct a renderer bound
    /// to it.
    pub async fn start(
        sink: Arc<dyn ChatMessageSink>,
        edit_interval: Duration,
        max_msg_length: usize,
    ) -> Result<Self, SinkError> {
        let handle = sink.send(&header_line(false, 0, false)).await?;
        Ok(Self {
            sink,
            messages: vec![handle],
            log: Vec::new(),
            rendered_up_to: 0,
            start: Instant::now(),
            last_edit: None,
            tick: 0,
            finalized: false,
            redactor: Redactor::new(),
            edit_interval,
            max_msg_length,
        })
    }

    /// All chat-message handles this renderer has sent, in order. Used by
    /// callers (and tests) to confirm no message is ever deleted.
    pub fn messages(&self) -> &[MessageHandle] {
        &self.messages
    }

    fn close_last_running(&mut self) {
        if let Some(last) = self.log.last_mut() {
            if last.is_running {
                last.close();
            }
        }
    }

    /// A `text` stream event: merges into an open text entry, or closes
    /// whatever was running and opens a new one.
    pub fn on_text(&mut self, content: &str) {
        if let Some(last) = self.log.last_mut() {
            if last.kind == ActivityKind::Text {
                last.content.push_str(content);
                return;
            }
        }
        self.close_last_running();
        self.log.push(ActivityEntry::text(content));
    }

    /// A `tool_use` stream event.
    pub fn on_tool_use(&mut self, tool_name: &str, detail: Option<String>) {
        self.close_last_running();
        self.log.push(ActivityEntry::tool(tool_name, detail));
    }

    /// A `tool_result` stream event: attaches to the immediately preceding
    /// tool entry, which is still running.
    pub fn on_tool_result(&mut self, result: &str) {
        if let Some(last) = self.log.last_mut() {
            if last.kind == ActivityKind::Tool {
                last.tool_result = Some(result.to_string());
            }
        }
    }

    /// A `thinking` stream event.
    pub fn on_thinking(&mut self) {
        self.close_last_running();
        self.log.push(ActivityEntry::thinking());
    }

    /// Edit the tail message with the current log, throttled to at most
    /// once per `edit_interval`. Rolls over to a new tail message if the
    /// rendered text would exceed `max_msg_length`.
    pub async fn update(&mut self) {
        if self.finalized {
            return;
        }
        let now = Instant::now();
        if let Some(last) = self.last_edit {
            if now.duration_since(last) < self.edit_interval {
                return;
            }
        }
        self.tick += 1;
        self.last_edit = Some(now);
        self.render_and_apply(false).await;
    }

    /// Flip every entry to not-running, edit the tail unconditionally
    /// (ignoring the throttle) with a "Done" header, and never roll over.
    /// Never deletes any message.
    pub async fn finalize(&mut self) {
        if self.finalized {
            return;
        }
        for entry in &mut self.log {
            entry.close();
        }
        self.finalized = true;
        self.render_and_apply(true).await;
    }

    async fn render_and_apply(&mut self, finalizing: bool) {
        let elapsed = self.start.elapsed().as_secs();
        let continued = self.rendered_up_to > 0;
        let window = &self.log[self.rendered_up_to..];
        let text = render_message(finalizing, elapsed, continued, window, self.tick, &self.redactor);

        if !finalizing && text.chars().count() > self.max_msg_length {
            self.roll_over(elapsed, &text).await;
            return;
        }

        let final_text = if finalizing && text.chars().count() > self.max_msg_length {
            truncate_with_marker(&text, self.max_msg_length, "…")
        } else {
            text
        };

        if let Some(tail) = self.messages.last() {
            if let Err(e) = self.sink.edit(tail, &final_text).await {
                tracing::warn!(error = %e, "progress renderer edit failed, continuing without it");
            }
        }
    }

    async fn roll_over(&mut self, elapsed: u64, candidate_text: &str) {
        let frozen_text = truncate_with_marker(candidate_text, self.max_msg_length, "(continued…)");
        if let Some(tail) = self.messages.last() {
            if let Err(e) = self.sink.edit(tail, &frozen_text).await {
                tracing::warn!(error = %e, "failed to freeze tail message during rollover");
            }
        }
        self.rendered_up_to = self.log.len();
        match self.sink.send(&header_line(false, elapsed, true)).await {
            Ok(handle) => self.messages.push(handle),
            Err(e) => tracing::warn!(error = %e, "failed to open rollover message"),
        }
    }
}

/// Truncate `text` to fit within `max_len` characters including `marker`,
/// appended as a trailing suffix.
fn truncate_with_marker(text: &str, max_len: usize, marker: &str) -> String {
    let marker_len = marker.chars().count();
    if text.chars().count() + marker_len <= max_len {
        return format!("{text}{marker}");
    }
    let keep = max_len.saturating_sub(marker_len);
    let truncated: String = text.chars().take(keep).collect();
    format!("{truncated}{marker}")
}
