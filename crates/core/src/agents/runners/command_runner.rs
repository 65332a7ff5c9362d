//! Runner backed by an external reasoning command.
//!
//! The command receives one JSON request line on stdin and answers with
//! JSON Lines on stdout:
//!
//! ```text
//! {"type":"thought","text":"..."}
//! {"type":"message","text":"..."}
//! {"type":"tool_call","id":1,"name":"search_arxiv","arguments":{...}}
//! {"type":"final","output":"..."}
//! ```
//!
//! Each `tool_call` is served through the agent's tool set and answered on
//! stdin with a `tool_result` line carrying the same `id`.

use crate::agents::base::{
    AgentError, AgentEvent, AgentEventStream, AgentRunner, ExecutionContext,
};
use async_trait::async_trait;
use ck_protocol::config_models::RunnerConfig;
use ck_protocol::run_models::TaskOutput;
use ck_protocol::tool_models::ToolDescriptor;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{ChildStdin, Command};
use tracing::{debug, warn};

/// Spawns `command args...` once per task.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    command: String,
    args: Vec<String>,
}

impl CommandRunner {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    /// Runner for the `[runner]` config section, if a command is set.
    pub fn from_config(config: &RunnerConfig) -> Option<Self> {
        config
            .command
            .as_ref()
            .map(|command| Self::new(command.clone(), config.args.clone()))
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

#[derive(Debug, Serialize)]
struct AgentProfile<'a> {
    name: &'a str,
    role: &'a str,
    goal: &'a str,
    backstory: &'a str,
    verbose: bool,
    reasoning: bool,
}

/// First line written to the runner's stdin.
#[derive(Debug, Serialize)]
struct TaskRequest<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    agent: AgentProfile<'a>,
    task: &'a str,
    description: &'a str,
    expected_output: &'a str,
    context: &'a [TaskOutput],
    tools: Vec<ToolDescriptor>,
}

#[derive(Debug, Serialize)]
struct ToolResultLine {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
    name: String,
    output: String,
    is_error: bool,
}

/// Lines the runner writes to stdout.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RunnerMessage {
    Thought {
        text: String,
    },
    Message {
        text: String,
    },
    ToolCall {
        #[serde(default)]
        id: Option<Value>,
        name: String,
        #[serde(default)]
        arguments: Value,
    },
    Final {
        output: String,
    },
}

fn request_line(context: &ExecutionContext) -> Result<Vec<u8>, AgentError> {
    let agent = &context.agent;
    let request = TaskRequest {
        kind: "task",
        agent: AgentProfile {
            name: &agent.name,
            role: &agent.role,
            goal: &agent.goal,
            backstory: &agent.backstory,
            verbose: agent.verbose,
            reasoning: agent.reasoning,
        },
        task: &context.task,
        description: &context.instruction,
        expected_output: &context.expected_output,
        context: &context.context,
        tools: agent.tools.descriptors(),
    };

    let mut line = serde_json::to_vec(&request)
        .map_err(|e| AgentError::ExecutionError(format!("Failed to encode task request: {e}")))?;
    line.push(b'\n');
    Ok(line)
}

async fn write_line(stdin: &mut ChildStdin, line: &[u8]) -> Result<(), AgentError> {
    stdin
        .write_all(line)
        .await
        .map_err(|e| AgentError::ExecutionError(format!("Failed to write to runner stdin: {e}")))?;
    stdin
        .flush()
        .await
        .map_err(|e| AgentError::ExecutionError(format!("Failed to flush runner stdin: {e}")))
}

#[async_trait]
impl AgentRunner for CommandRunner {
    fn name(&self) -> &str {
        &self.command
    }

    async fn check_availability(&self) -> bool {
        which::which(&self.command).is_ok()
    }

    async fn execute(&self, context: &ExecutionContext) -> Result<AgentEventStream, AgentError> {
        let request = request_line(context)?;

        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args)
            .current_dir(&context.working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| {
            AgentError::ExecutionError(format!("Failed to spawn command '{}': {e}", self.command))
        })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| AgentError::ExecutionError("Failed to capture stdin".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AgentError::ExecutionError("Failed to capture stdout".to_string()))?;

        if let Some(stderr) = child.stderr.take() {
            let command = self.command.clone();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!(runner = %command, "{line}");
                }
            });
        }

        write_line(&mut stdin, &request).await?;

        let tools = context.agent.tools.clone();
        let command = self.command.clone();

        let stream = async_stream::stream! {
            let mut stdin = Some(stdin);
            let mut lines = BufReader::new(stdout).lines();
            let mut finished = false;

            loop {
                let line = match lines.next_line().await {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        yield Err(AgentError::StreamParseError(e.to_string()));
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }

                let message = match serde_json::from_str::<RunnerMessage>(&line) {
                    Ok(message) => message,
                    Err(e) => {
                        yield Err(AgentError::StreamParseError(format!(
                            "Failed to parse JSON: {e} (line: {line})"
                        )));
                        continue;
                    }
                };

                match message {
                    RunnerMessage::Thought { text } => yield Ok(AgentEvent::Thought(text)),
                    RunnerMessage::Message { text } => yield Ok(AgentEvent::MessageChunk(text)),
                    RunnerMessage::ToolCall { id, name, arguments } => {
                        yield Ok(AgentEvent::ToolCall {
                            name: name.clone(),
                            arguments: arguments.clone(),
                        });

                        let (output, is_error) = match tools.invoke(&name, arguments).await {
                            Ok(output) => (output.text, output.is_error),
                            Err(e) => {
                                warn!(tool = %name, error = %e, "Tool call failed");
                                (e.to_string(), true)
                            }
                        };

                        let reply = ToolResultLine {
                            kind: "tool_result",
                            id,
                            name: name.clone(),
                            output: output.clone(),
                            is_error,
                        };
                        if let Some(pipe) = stdin.as_mut() {
                            let written = match serde_json::to_vec(&reply) {
                                Ok(mut bytes) => {
                                    bytes.push(b'\n');
                                    write_line(pipe, &bytes).await
                                }
                                Err(e) => Err(AgentError::ExecutionError(e.to_string())),
                            };
                            if let Err(e) = written {
                                yield Err(e);
                                break;
                            }
                        }

                        yield Ok(AgentEvent::ToolResult { name, output, is_error });
                    }
                    RunnerMessage::Final { output } => {
                        finished = true;
                        yield Ok(AgentEvent::Completed { output: Some(output) });
                        break;
                    }
                }
            }

            // Closing stdin tells the runner no more tool results are coming.
            drop(stdin.take());

            match child.wait().await {
                Ok(status) if status.success() => {
                    if !finished {
                        yield Ok(AgentEvent::Completed { output: None });
                    }
                }
                Ok(status) if !finished => {
                    yield Err(AgentError::ExecutionError(format!(
                        "Runner '{command}' exited with {status}"
                    )));
                }
                Ok(status) => {
                    debug!(runner = %command, %status, "Runner exited after final answer")
                }
                Err(e) => {
                    if !finished {
                        yield Err(AgentError::ExecutionError(format!(
                            "Failed to wait for runner '{command}': {e}"
                        )));
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crew::build_agent;
    use crate::mcp::ToolSet;
    use ck_protocol::agent_models::AgentConfig;
    use tokio_stream::StreamExt;

    fn context(dir: &std::path::Path) -> ExecutionContext {
        let agent = build_agent(
            &AgentConfig {
                name: "researcher".to_string(),
                role: "Researcher".to_string(),
                goal: "Find papers".to_string(),
                verbose: false,
                reasoning: true,
                tools: None,
                backstory: String::new(),
            },
            &ToolSet::default(),
        );
        ExecutionContext::new(agent, "search_task", "Search arXiv").with_working_dir(dir)
    }

    fn script(dir: &std::path::Path, body: &str) -> CommandRunner {
        let path = dir.join("runner.sh");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        CommandRunner::new("sh", vec![path.to_str().unwrap().to_string()])
    }

    #[test]
    fn test_from_config() {
        assert!(CommandRunner::from_config(&RunnerConfig::default()).is_none());

        let runner = CommandRunner::from_config(&RunnerConfig {
            command: Some("crew-runner".to_string()),
            args: vec!["--fast".to_string()],
        })
        .unwrap();
        assert_eq!(runner.command(), "crew-runner");
    }

    #[test]
    fn test_request_line_shape() {
        let dir = tempfile::tempdir().unwrap();
        let line = request_line(&context(dir.path())).unwrap();
        assert_eq!(line.last(), Some(&b'\n'));

        let value: Value = serde_json::from_slice(&line).unwrap();
        assert_eq!(value["type"], "task");
        assert_eq!(value["agent"]["name"], "researcher");
        assert_eq!(value["agent"]["reasoning"], true);
        assert_eq!(value["description"], "Search arXiv");
        assert_eq!(value["tools"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_unavailable_command() {
        let runner = CommandRunner::new("nonexistent-command-xyz", Vec::new());
        assert!(!runner.check_availability().await);
    }

    #[tokio::test]
    async fn test_stream_from_script() {
        let dir = tempfile::tempdir().unwrap();
        let runner = script(
            dir.path(),
            r#"read request
echo '{"type":"thought","text":"reading"}'
echo ''
echo '{"type":"message","text":"partial"}'
echo '{"type":"final","output":"three papers"}'"#,
        );

        let events: Vec<_> = runner
            .execute(&context(dir.path()))
            .await
            .unwrap()
            .collect()
            .await;

        assert_eq!(
            events,
            vec![
                Ok(AgentEvent::Thought("reading".to_string())),
                Ok(AgentEvent::MessageChunk("partial".to_string())),
                Ok(AgentEvent::Completed {
                    output: Some("three papers".to_string())
                }),
            ]
        );
    }

    #[tokio::test]
    async fn test_tool_call_without_tools_gets_error_result() {
        let dir = tempfile::tempdir().unwrap();
        let runner = script(
            dir.path(),
            r#"read request
echo '{"type":"tool_call","id":1,"name":"search_arxiv","arguments":{"query":"x"}}'
read result
case "$result" in
  *'"is_error":true'*) echo '{"type":"final","output":"no tools"}' ;;
  *) echo '{"type":"final","output":"unexpected"}' ;;
esac"#,
        );

        let events: Vec<_> = runner
            .execute(&context(dir.path()))
            .await
            .unwrap()
            .collect()
            .await;

        assert!(matches!(events[0], Ok(AgentEvent::ToolCall { .. })));
        assert!(matches!(
            events[1],
            Ok(AgentEvent::ToolResult { is_error: true, .. })
        ));
        assert_eq!(
            events[2],
            Ok(AgentEvent::Completed {
                output: Some("no tools".to_string())
            })
        );
    }

    #[tokio::test]
    async fn test_nonzero_exit_without_final_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let runner = script(
            dir.path(),
            "read request\necho '{\"type\":\"message\",\"text\":\"hm\"}'\nexit 3",
        );

        let events: Vec<_> = runner
            .execute(&context(dir.path()))
            .await
            .unwrap()
            .collect()
            .await;

        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], Err(AgentError::ExecutionError(_))));
    }

    #[tokio::test]
    async fn test_invalid_json_line() {
        let dir = tempfile::tempdir().unwrap();
        let runner = script(dir.path(), "read request\necho 'not json'");

        let events: Vec<_> = runner
            .execute(&context(dir.path()))
            .await
            .unwrap()
            .collect()
            .await;

        assert!(matches!(events[0], Err(AgentError::StreamParseError(_))));
        assert_eq!(events[1], Ok(AgentEvent::Completed { output: None }));
    }
}
