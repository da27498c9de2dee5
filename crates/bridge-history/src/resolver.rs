//! Session Resolver: reads the agent CLI's line-delimited JSON history
//! file and per-project transcripts.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::entry::{HistoryEntry, RawTranscriptLine, TranscriptMessage};

/// Threshold above which `CheckFormatHealth` surfaces a warning: more than
/// half the lines in the history file failed to parse.
const UNPARSEABLE_WARNING_THRESHOLD: f64 = 0.5;

/// Reads `history.jsonl` and per-project transcript files.
///
/// Stateless aside from the resolved history-file path; safe to construct
/// per-request. All operations degrade to an empty result rather than an
/// error on a missing file, per the CLI history's failure semantics.
pub struct SessionResolver {
    history_path: PathBuf,
    agent_config_dir: PathBuf,
}

impl SessionResolver {
    pub fn new(history_path: PathBuf, agent_config_dir: PathBuf) -> Self {
        Self { history_path, agent_config_dir }
    }

    /// Construct a resolver pointed at `bridge_core::config`'s defaults.
    pub fn from_config() -> Self {
        Self::new(bridge_core::config::history_file(), bridge_core::config::agent_config_dir())
    }

    /// Read and parse every history line, newest-first. Malformed lines are
    /// skipped and logged; a missing file yields an empty vector.
    fn read_all(&self) -> (Vec<HistoryEntry>, usize, usize) {
        let raw = match std::fs::read_to_string(&self.history_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return (Vec::new(), 0, 0),
            Err(e) => {
                warn!(error = %e, path = %self.history_path.display(), "failed to read history file");
                return (Vec::new(), 0, 0);
            }
        };

        let mut entries = Vec::new();
        let mut total = 0usize;
        let mut unparseable = 0usize;
        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            total += 1;
            match serde_json::from_str::<HistoryEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    unparseable += 1;
                    warn!(error = %e, "skipping malformed history line");
                }
            }
        }
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        (entries, total, unparseable)
    }

    /// Most recent session whose `project` equals `directory`, if any.
    pub fn get_latest_session(&self, directory: &Path) -> Option<String> {
        let canonical = canonicalize_lossy(directory);
        let (entries, _, _) = self.read_all();
        entries
            .into_iter()
            .find(|e| canonicalize_lossy(Path::new(&e.project)) == canonical)
            .map(|e| e.session_id)
    }

    /// Up to `limit` entries, newest first, optionally filtered by
    /// directory.
    pub fn list_sessions(&self, directory: Option<&Path>, limit: usize) -> Vec<HistoryEntry> {
        let canonical = directory.map(canonicalize_lossy);
        let (entries, _, _) = self.read_all();
        entries
            .into_iter()
            .filter(|e| match &canonical {
                Some(dir) => &canonicalize_lossy(Path::new(&e.project)) == dir,
                None => true,
            })
            .take(limit)
            .collect()
    }

    /// Linear lookup of one entry by session id in an already-fetched list.
    pub fn find_session_by_id<'a>(
        entries: &'a [HistoryEntry],
        session_id: &str,
    ) -> Option<&'a HistoryEntry> {
        entries.iter().find(|e| e.session_id == session_id)
    }

    /// Read up to `limit` exchanges from a session's transcript file.
    /// `from_start` selects the first N exchanges (session-handoff path)
    /// rather than the default last N.
    pub fn read_transcript(
        &self,
        session_id: &str,
        project_dir: &Path,
        limit: usize,
        from_start: bool,
    ) -> Vec<TranscriptMessage> {
        let dir = self.transcripts_dir(project_dir);
        let Some(path) = find_transcript_file(&dir, session_id) else {
            return Vec::new();
        };
        let Ok(raw) = std::fs::read_to_string(&path) else {
            return Vec::new();
        };

        let messages: Vec<TranscriptMessage> = raw
            .lines()
            .filter_map(|line| serde_json::from_str::<RawTranscriptLine>(line).ok())
            .filter_map(RawTranscriptLine::into_message)
            .collect();

        if from_start {
            messages.into_iter().take(limit).collect()
        } else {
            let skip = messages.len().saturating_sub(limit);
            messages.into_iter().skip(skip).collect()
        }
    }

    fn transcripts_dir(&self, project_dir: &Path) -> PathBuf {
        let key = project_dir
            .to_string_lossy()
            .chars()
            .map(|c| if c == '/' || c == '\\' { '-' } else { c })
            .collect::<String>();
        self.agent_config_dir.join("projects").join(key)
    }

    /// Report a warning when more than half the history lines fail to
    /// parse — a signal of CLI version skew.
    pub fn check_format_health(&self) -> Option<String> {
        let (_, total, unparseable) = self.read_all();
        if total == 0 {
            return None;
        }
        let ratio = unparseable as f64 / total as f64;
        if ratio > UNPARSEABLE_WARNING_THRESHOLD {
            Some(format!(
                "{unparseable} of {total} history lines could not be parsed ({:.0}%); the agent CLI's history format may have changed.",
                ratio * 100.0
            ))
        } else {
            None
        }
    }
}

fn canonicalize_lossy(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn find_transcript_file(dir: &Path, session_id: &str) -> Option<PathBuf> {
    let entries = std::fs::read_dir(dir).ok()?;
    entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| p.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.contains(session_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_history(dir: &Path, lines: &[&str]) -> PathBuf {
        let path = dir.join("history.jsonl");
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        path
    }

    #[test]
    fn missing_history_file_returns_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let resolver = SessionResolver::new(tmp.path().join("absent.jsonl"), tmp.path().to_path_buf());
        assert!(resolver.list_sessions(None, 10).is_empty());
        assert_eq!(resolver.get_latest_session(Path::new("/w/p")), None);
    }

    #[test]
    fn malformed_lines_are_skipped_not_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_history(
            tmp.path(),
            &[
                r#"{"sessionId": "s1", "project": "/w/p", "timestamp": 100}"#,
                "not json at all",
                r#"{"project": "/w/p", "timestamp": 200}"#,
            ],
        );
        let resolver = SessionResolver::new(path, tmp.path().to_path_buf());
        let entries = resolver.list_sessions(None, 10);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].session_id, "s1");
    }

    #[test]
    fn entries_sorted_newest_first() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_history(
            tmp.path(),
            &[
                r#"{"sessionId": "old", "project": "/w/p", "timestamp": 100}"#,
                r#"{"sessionId": "new", "project": "/w/p", "timestamp": 999}"#,
            ],
        );
        let resolver = SessionResolver::new(path, tmp.path().to_path_buf());
        let entries = resolver.list_sessions(None, 10);
        assert_eq!(entries[0].session_id, "new");
        assert_eq!(entries[1].session_id, "old");
    }

    #[test]
    fn get_latest_session_filters_by_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_history(
            tmp.path(),
            &[
                r#"{"sessionId": "a", "project": "/w/a", "timestamp": 300}"#,
                r#"{"sessionId": "b", "project": "/w/b", "timestamp": 400}"#,
            ],
        );
        let resolver = SessionResolver::new(path, tmp.path().to_path_buf());
        assert_eq!(resolver.get_latest_session(Path::new("/w/a")), Some("a".to_string()));
    }

    #[test]
    fn format_health_warns_above_threshold() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_history(
            tmp.path(),
            &["garbage one", "garbage two", r#"{"sessionId": "a", "project": "/w/a", "timestamp": 1}"#],
        );
        let resolver = SessionResolver::new(path, tmp.path().to_path_buf());
        assert!(resolver.check_format_health().is_some());
    }

    #[test]
    fn format_health_silent_below_threshold() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_history(
            tmp.path(),
            &[
                r#"{"sessionId": "a", "project": "/w/a", "timestamp": 1}"#,
                r#"{"sessionId": "b", "project": "/w/a", "timestamp": 2}"#,
                "garbage",
            ],
        );
        let resolver = SessionResolver::new(path, tmp.path().to_path_buf());
        assert_eq!(resolver.check_format_health(), None);
    }

    #[test]
    fn find_session_by_id_is_linear_lookup() {
        let entries = vec![
            HistoryEntry { session_id: "a".into(), display: String::new(), timestamp: 1, project: "/x".into() },
            HistoryEntry { session_id: "b".into(), display: String::new(), timestamp: 2, project: "/x".into() },
        ];
        let found = SessionResolver::find_session_by_id(&entries, "b");
        assert_eq!(found.unwrap().session_id, "b");
    }
}
