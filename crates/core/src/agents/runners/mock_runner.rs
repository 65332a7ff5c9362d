//! Scripted runner for tests and `crewkit run --mock`.

use crate::agents::base::{AgentError, AgentEvent, AgentEventStream, AgentRunner, ExecutionContext};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Clone)]
enum Script {
    /// Yield these events verbatim.
    Events(Vec<Result<AgentEvent, AgentError>>),
    /// Answer with a summary of the task.
    Echo,
    /// Call one tool from the agent's tool set and answer with its output.
    InvokeTool { name: String, arguments: Value },
}

/// Runner that never leaves the process.
///
/// Every context it is asked to execute is recorded and can be inspected
/// with [`MockRunner::contexts`].
#[derive(Clone)]
pub struct MockRunner {
    available: bool,
    script: Script,
    seen: Arc<Mutex<Vec<ExecutionContext>>>,
}

impl MockRunner {
    fn with_script(available: bool, script: Script) -> Self {
        Self {
            available,
            script,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn new(available: bool, events: Vec<Result<AgentEvent, AgentError>>) -> Self {
        Self::with_script(available, Script::Events(events))
    }

    pub fn success() -> Self {
        Self::new(
            true,
            vec![
                Ok(AgentEvent::Thought("Mock runner thinking".to_string())),
                Ok(AgentEvent::MessageChunk("Mock response".to_string())),
                Ok(AgentEvent::Completed { output: None }),
            ],
        )
    }

    pub fn unavailable() -> Self {
        Self::new(false, Vec::new())
    }

    pub fn failing() -> Self {
        Self::new(
            true,
            vec![
                Ok(AgentEvent::Thought("Starting...".to_string())),
                Err(AgentError::ExecutionError("Mock failure".to_string())),
            ],
        )
    }

    /// Answers every task with `[agent] task: instruction`.
    pub fn echo() -> Self {
        Self::with_script(true, Script::Echo)
    }

    /// Calls `name` with `arguments` through the agent's tool set.
    pub fn invoking(name: impl Into<String>, arguments: Value) -> Self {
        Self::with_script(
            true,
            Script::InvokeTool {
                name: name.into(),
                arguments,
            },
        )
    }

    /// Contexts passed to `execute`, in call order.
    pub fn contexts(&self) -> Vec<ExecutionContext> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl AgentRunner for MockRunner {
    fn name(&self) -> &str {
        "mock"
    }

    async fn check_availability(&self) -> bool {
        self.available
    }

    async fn execute(&self, context: &ExecutionContext) -> Result<AgentEventStream, AgentError> {
        if !self.available {
            return Err(AgentError::NotAvailable(
                "Mock runner not available".to_string(),
            ));
        }

        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(context.clone());

        match &self.script {
            Script::Events(events) => Ok(Box::pin(tokio_stream::iter(events.clone()))),
            Script::Echo => {
                let answer = format!(
                    "[{}] {}: {}",
                    context.agent.name, context.task, context.instruction
                );
                Ok(Box::pin(tokio_stream::iter(vec![
                    Ok(AgentEvent::Thought(format!(
                        "{} has {} tool(s)",
                        context.agent.role,
                        context.agent.tools.len()
                    ))),
                    Ok(AgentEvent::MessageChunk(answer)),
                    Ok(AgentEvent::Completed { output: None }),
                ])))
            }
            Script::InvokeTool { name, arguments } => {
                let tools = context.agent.tools.clone();
                let name = name.clone();
                let arguments = arguments.clone();

                let stream = async_stream::stream! {
                    yield Ok(AgentEvent::ToolCall {
                        name: name.clone(),
                        arguments: arguments.clone(),
                    });
                    let (output, is_error) = match tools.invoke(&name, arguments).await {
                        Ok(output) => (output.text, output.is_error),
                        Err(e) => (e.to_string(), true),
                    };
                    yield Ok(AgentEvent::ToolResult {
                        name,
                        output: output.clone(),
                        is_error,
                    });
                    yield Ok(AgentEvent::Completed { output: Some(output) });
                };
                Ok(Box::pin(stream))
            }
        }
    }
}
