//! Pure rendering: turns a header plus a window of `ActivityEntry`s into
//! the text of one chat message. No I/O, no state beyond its arguments.

use bridge_core::Redactor;

use crate::entry::{ActivityEntry, ActivityKind};

const TOOL_ICON: &str = "🔧";
const SPINNER: &str = "⏳";
const THINKING_ICON: &str = "💭";
const FOLD_GLYPH: &str = "⎿";

pub fn header_line(finalized: bool, elapsed_secs: u64, continued: bool) -> String {
    let label = if finalized { "Done" } else { "Working…" };
    let suffix = if continued { " (continued)" } else { "" };
    format!("{label} ({elapsed_secs}s){suffix}")
}

/// Render one chat message's body from a window of entries.
pub fn render_entries(entries: &[ActivityEntry], tick: u64, finalized: bool, redactor: &Redactor) -> String {
    entries
        .iter()
        .map(|entry| render_one(entry, tick, finalized, redactor))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_one(entry: &ActivityEntry, tick: u64, finalized: bool, redactor: &Redactor) -> String {
    match entry.kind {
        ActivityKind::Text => entry.content.clone(),
        ActivityKind::Tool => render_tool(entry, finalized, redactor),
        ActivityKind::Thinking => render_thinking(entry, tick, finalized),
    }
}

fn render_tool(entry: &ActivityEntry, finalized: bool, redactor: &Redactor) -> String {
    let name = entry.tool_name.as_deref().unwrap_or("tool");
    let mut line = format!("{TOOL_ICON} {name}");
    if let Some(detail) = &entry.tool_detail {
        line.push_str(": ");
        line.push_str(&redactor.redact(detail));
    }
    if entry.is_running && !finalized {
        line.push(' ');
        line.push_str(SPINNER);
    }
    if let Some(result) = &entry.tool_result {
        if !result.is_empty() {
            line.push('\n');
            line.push_str(FOLD_GLYPH);
            line.push(' ');
            line.push_str(&redactor.redact(result));
        }
    }
    line
}

fn render_thinking(entry: &ActivityEntry, tick: u64, finalized: bool) -> String {
    if entry.is_running && !finalized {
        let dots = ".".repeat(((tick % 3) + 1) as usize);
        format!("{THINKING_ICON} Thinking{dots}")
    } else {
        format!("{THINKING_ICON} Thinking (done)")
    }
}

/// Full rendered text of one message: header, blank line, entry blocks.
pub fn render_message(
    finalized: bool,
    elapsed_secs: u64,
    continued: bool,
    entries: &[ActivityEntry],
    tick: u64,
    redactor: &Redactor,
) -> String {
    let header = header_line(finalized, elapsed_secs, continued);
    let body = render_entries(entries, tick, finalized, redactor);
    if body.is_empty() {
        header
    } else {
        format!("{header}\n\n{body}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redactor() -> Redactor {
        Redactor::new()
    }

    #[test]
    fn header_reflects_working_vs_done() {
        assert_eq!(header_line(false, 3, false), "Working… (3s)");
        assert_eq!(header_line(true, 7, false), "Done (7s)");
    }

    #[test]
    fn continued_header_carries_suffix() {
        assert_eq!(header_line(false, 1, true), "Working… (1s) (continued)");
    }

    #[test]
    fn running_tool_shows_spinner_unless_finalized() {
        let entry = ActivityEntry::tool("Read", Some("/x/foo.py".into()));
        let running = render_tool(&entry, false, &redactor());
        assert!(running.ends_with("⏳"));
        let done = render_tool(&entry, true, &redactor());
        assert!(!done.contains("⏳"));
    }

    #[test]
    fn tool_result_appends_folded_line() {
        let mut entry = ActivityEntry::tool("Edit", Some("/x/foo.py".into()));
        entry.tool_result = Some("Applied 1 edit".into());
        entry.is_running = false;
        let rendered = render_tool(&entry, true, &redactor());
        assert!(rendered.contains("⎿ Applied 1 edit"));
    }

    #[test]
    fn thinking_cycles_dots_with_tick() {
        let entry = ActivityEntry::thinking();
        assert_eq!(render_thinking(&entry, 0, false), "💭 Thinking.");
        assert_eq!(render_thinking(&entry, 1, false), "💭 Thinking..");
        assert_eq!(render_thinking(&entry, 2, false), "💭 Thinking...");
        assert_eq!(render_thinking(&entry, 3, false), "💭 Thinking.");
    }

    #[test]
    fn finalized_thinking_shows_done_marker() {
        let entry = ActivityEntry::thinking();
        assert_eq!(render_thinking(&entry, 0, true), "💭 Thinking (done)");
    }

    #[test]
    fn tool_detail_is_redacted() {
        let entry = ActivityEntry::tool("Bash", Some("curl -H 'Bearer abcdefghijklmno12345'".into()));
        let rendered = render_tool(&entry, true, &redactor());
        assert!(!rendered.contains("abcdefghijklmno12345"));
    }
}
