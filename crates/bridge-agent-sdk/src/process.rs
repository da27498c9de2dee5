//! `SubprocessAgentClient`: the real `AgentClient`, backed by the agent
//! CLI's own subprocess. Speaks the CLI's `--input-format stream-json
//! --output-format stream-json` wire protocol: one JSON object per line
//! in each direction, the same shape the CLI's own history/transcript
//! files use (see `bridge-history`).

use std::process::Stdio;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, Command};

use crate::client::{AgentClient, AvailableCommand, ServerInfo};
use crate::content::{ContentBlock, UserMessageEnvelope};
use crate::error::{AgentSdkError, Result};
use crate::message::{AssistantBlock, SdkMessage};
use crate::options::AgentOptions;

/// Name of the agent CLI binary, overridable for anyone who installs it
/// under a different name.
const AGENT_CLI_BIN_ENV: &str = "BRIDGE_AGENT_CLI_BIN";
const DEFAULT_AGENT_CLI_BIN: &str = "claude";

/// Drives the agent CLI as a long-lived subprocess. One instance per
/// connected user, owned exclusively by that user's `bridge-actor` worker
/// task for its whole lifetime.
pub struct SubprocessAgentClient {
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stdout: Option<Lines<BufReader<tokio::process::ChildStdout>>>,
}

impl SubprocessAgentClient {
    pub fn new() -> Self {
        Self { child: None, stdin: None, stdout: None }
    }

    fn binary() -> String {
        std::env::var(AGENT_CLI_BIN_ENV).unwrap_or_else(|_| DEFAULT_AGENT_CLI_BIN.to_string())
    }

    fn build_args(options: &AgentOptions) -> Vec<String> {
        let mut args = vec![
            "--input-format".to_string(),
            "stream-json".to_string(),
            "--output-format".to_string(),
            "stream-json".to_string(),
            "--permission-mode".to_string(),
            options.permission_mode.to_string(),
        ];
        if let Some(session_id) = &options.resume_session_id {
            args.push("--resume".to_string());
            args.push(session_id.clone());
        }
        if let Some(model) = &options.model {
            args.push("--model".to_string());
            args.push(model.clone());
        }
        for beta in &options.betas {
            args.push("--beta".to_string());
            args.push(beta.clone());
        }
        args.push("--append-system-prompt".to_string());
        args.push(options.system_prompt.clone());
        args
    }

    async fn write_line(&mut self, value: &Value) -> Result<()> {
        let stdin = self.stdin.as_mut().ok_or(AgentSdkError::NotConnected)?;
        let mut line = serde_json::to_vec(value).map_err(|e| AgentSdkError::ProtocolError(e.to_string()))?;
        line.push(b'\n');
        stdin
            .write_all(&line)
            .await
            .map_err(|e| AgentSdkError::ConnectionLost(e.to_string()))?;
        stdin.flush().await.map_err(|e| AgentSdkError::ConnectionLost(e.to_string()))
    }
}

impl Default for SubprocessAgentClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AgentClient for SubprocessAgentClient {
    async fn connect(&mut self, options: &AgentOptions) -> Result<()> {
        if self.child.is_some() {
            return Err(AgentSdkError::AlreadyConnected);
        }

        let mut child = Command::new(Self::binary())
            .args(Self::build_args(options))
            .current_dir(&options.cwd)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AgentSdkError::ConnectFailed(e.to_string()))?;

        let stdin = child.stdin.take().ok_or_else(|| AgentSdkError::ConnectFailed("no stdin pipe".into()))?;
        let stdout = child.stdout.take().ok_or_else(|| AgentSdkError::ConnectFailed("no stdout pipe".into()))?;

        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stdout = Some(BufReader::new(stdout).lines());
        Ok(())
    }

    async fn query(&mut self, blocks: Vec<ContentBlock>) -> Result<()> {
        let envelope = UserMessageEnvelope::new(blocks);
        let value = serde_json::to_value(&envelope).map_err(|e| AgentSdkError::ProtocolError(e.to_string()))?;
        self.write_line(&value).await
    }

    async fn receive_message(&mut self) -> Result<Option<SdkMessage>> {
        let stdout = self.stdout.as_mut().ok_or(AgentSdkError::NotConnected)?;
        let line = stdout.next_line().await.map_err(|e| AgentSdkError::ConnectionLost(e.to_string()))?;
        let Some(line) = line else { return Ok(None) };
        if line.trim().is_empty() {
            return Ok(Some(SdkMessage::Other));
        }
        let value: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(_) => return Ok(Some(SdkMessage::Other)),
        };
        Ok(Some(parse_message(&value)))
    }

    async fn interrupt(&mut self) -> Result<()> {
        if self.stdin.is_none() {
            return Err(AgentSdkError::NotConnected);
        }
        self.write_line(&json!({ "type": "control", "subtype": "interrupt" })).await
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.stdin = None;
        self.stdout = None;
        if let Some(mut child) = self.child.take() {
            let _ = child.start_kill();
            let _ = child.wait().await;
        }
        Ok(())
    }

    async fn get_server_info(&mut self) -> Result<ServerInfo> {
        let stdin_present = self.stdin.is_some();
        if !stdin_present {
            return Err(AgentSdkError::NotConnected);
        }
        self.write_line(&json!({ "type": "control", "subtype": "get_server_info" })).await?;
        // Called right after `connect()`, before any query is submitted, so
        // the next line on the wire is the control reply itself.
        match self.receive_message().await? {
            Some(SdkMessage::ControlResponse { commands }) => Ok(ServerInfo { commands }),
            _ => Ok(ServerInfo::default()),
        }
    }
}

fn parse_message(value: &Value) -> SdkMessage {
    match value.get("type").and_then(Value::as_str) {
        Some("assistant") => SdkMessage::Assistant { blocks: parse_assistant_blocks(value) },
        Some("user") => SdkMessage::User { content: parse_user_text(value) },
        Some("result") => SdkMessage::Result {
            result: value.get("result").and_then(Value::as_str).unwrap_or_default().to_string(),
            session_id: value.get("session_id").and_then(Value::as_str).unwrap_or_default().to_string(),
            total_cost_usd: value.get("total_cost_usd").and_then(Value::as_f64),
        },
        Some("control_response") => SdkMessage::ControlResponse { commands: parse_available_commands(value) },
        _ => SdkMessage::Other,
    }
}

fn parse_available_commands(value: &Value) -> Vec<AvailableCommand> {
    let Some(commands) = value.pointer("/response/commands").and_then(Value::as_array) else {
        return Vec::new();
    };
    commands
        .iter()
        .map(|c| AvailableCommand {
            name: c.get("name").and_then(Value::as_str).unwrap_or_default().to_string(),
            description: c.get("description").and_then(Value::as_str).unwrap_or_default().to_string(),
            argument_hint: c.get("argument_hint").and_then(Value::as_str).map(str::to_string),
        })
        .collect()
}

fn parse_assistant_blocks(value: &Value) -> Vec<AssistantBlock> {
    let Some(blocks) = value.pointer("/message/content").and_then(Value::as_array) else {
        return Vec::new();
    };
    blocks
        .iter()
        .filter_map(|block| match block.get("type").and_then(Value::as_str) {
            Some("text") => {
                Some(AssistantBlock::Text { text: block.get("text").and_then(Value::as_str).unwrap_or_default().into() })
            }
            Some("thinking") => Some(AssistantBlock::Thinking {
                text: block.get("thinking").and_then(Value::as_str).unwrap_or_default().into(),
            }),
            Some("tool_use") => Some(AssistantBlock::ToolUse {
                name: block.get("name").and_then(Value::as_str).unwrap_or_default().into(),
                input: block
                    .get("input")
                    .and_then(Value::as_object)
                    .map(|m| m.clone().into_iter().collect())
                    .unwrap_or_default(),
                is_partial: block.get("partial").and_then(Value::as_bool).unwrap_or(false),
            }),
            _ => None,
        })
        .collect()
}

fn parse_user_text(value: &Value) -> String {
    value
        .pointer("/message/content")
        .and_then(Value::as_array)
        .map(|blocks| {
            blocks
                .iter()
                .filter_map(|b| b.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn args_include_resume_model_betas_and_system_prompt() {
        let options = AgentOptions {
            cwd: std::path::PathBuf::from("/tmp"),
            resume_session_id: Some("sess-1".to_string()),
            model: Some("sonnet".to_string()),
            betas: vec!["context-1m".to_string()],
            permission_mode: "bypass",
            system_prompt: "be helpful".to_string(),
            permission_callback: None,
        };

        let args = SubprocessAgentClient::build_args(&options);
        assert!(args.contains(&"--resume".to_string()));
        assert!(args.contains(&"sess-1".to_string()));
        assert!(args.contains(&"--model".to_string()));
        assert!(args.contains(&"sonnet".to_string()));
        assert!(args.contains(&"--beta".to_string()));
        assert!(args.contains(&"context-1m".to_string()));
        assert!(args.contains(&"--append-system-prompt".to_string()));
        assert!(args.contains(&"be helpful".to_string()));
    }

    #[test]
    fn parses_result_message() {
        let value = json!({"type": "result", "result": "done", "session_id": "sess-1", "total_cost_usd": 0.02});
        let msg = parse_message(&value);
        assert_eq!(
            msg,
            SdkMessage::Result { result: "done".into(), session_id: "sess-1".into(), total_cost_usd: Some(0.02) }
        );
    }

    #[test]
    fn parses_assistant_text_blocks() {
        let value = json!({
            "type": "assistant",
            "message": {"content": [{"type": "text", "text": "hi"}]}
        });
        let msg = parse_message(&value);
        assert_eq!(msg, SdkMessage::Assistant { blocks: vec![AssistantBlock::Text { text: "hi".into() }] });
    }

    #[test]
    fn parses_control_response_into_available_commands() {
        let value = json!({
            "type": "control_response",
            "response": {
                "subtype": "success",
                "commands": [
                    {"name": "review", "description": "review the diff", "argument_hint": "[path]"},
                    {"name": "commit", "description": "create a commit"},
                ]
            }
        });
        let msg = parse_message(&value);
        assert_eq!(
            msg,
            SdkMessage::ControlResponse {
                commands: vec![
                    AvailableCommand {
                        name: "review".into(),
                        description: "review the diff".into(),
                        argument_hint: Some("[path]".into()),
                    },
                    AvailableCommand { name: "commit".into(), description: "create a commit".into(), argument_hint: None },
                ]
            }
        );
    }

    #[test]
    fn unrecognized_message_type_is_other() {
        let value = json!({"type": "system"});
        assert_eq!(parse_message(&value), SdkMessage::Other);
    }
}
