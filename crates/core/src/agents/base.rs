//! Runner trait and supporting types.
//!
//! A runner performs one agent's reasoning for one task and reports what it
//! does as a stream of [`AgentEvent`]s.

use crate::crew::Agent;
use async_trait::async_trait;
use ck_protocol::run_models::TaskOutput;
use serde_json::Value;
use std::path::PathBuf;
use std::pin::Pin;
use thiserror::Error;
use tokio_stream::Stream;

/// Everything a runner needs to execute one task.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Agent with inputs already applied; its tool set is what the runner
    /// may call.
    pub agent: Agent,

    /// Task identifier.
    pub task: String,

    /// Rendered task description.
    pub instruction: String,

    pub expected_output: String,

    /// Outputs of the tasks that ran before this one.
    pub context: Vec<TaskOutput>,

    pub working_dir: PathBuf,
}

impl ExecutionContext {
    /// Context with no expected output, no prior outputs and the current
    /// directory as working directory.
    pub fn new(agent: Agent, task: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            agent,
            task: task.into(),
            instruction: instruction.into(),
            expected_output: String::new(),
            context: Vec::new(),
            working_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    pub fn with_expected_output(mut self, expected_output: impl Into<String>) -> Self {
        self.expected_output = expected_output.into();
        self
    }

    pub fn with_context(mut self, context: Vec<TaskOutput>) -> Self {
        self.context = context;
        self
    }

    pub fn with_working_dir(mut self, working_dir: impl Into<PathBuf>) -> Self {
        self.working_dir = working_dir.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    Thought(String),
    ToolCall {
        name: String,
        arguments: Value,
    },
    ToolResult {
        name: String,
        output: String,
        is_error: bool,
    },
    MessageChunk(String),
    /// The task is done. `output` is the final answer when the runner gives
    /// one explicitly; otherwise the message chunks are the answer.
    Completed {
        output: Option<String>,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("Runner not available: {0}")]
    NotAvailable(String),
    #[error("Stream parsing error: {0}")]
    StreamParseError(String),
    #[error("Execution failed: {0}")]
    ExecutionError(String),
}

pub type AgentEventStream = Pin<Box<dyn Stream<Item = Result<AgentEvent, AgentError>> + Send>>;

#[async_trait]
pub trait AgentRunner: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    async fn check_availability(&self) -> bool;

    async fn execute(&self, context: &ExecutionContext) -> Result<AgentEventStream, AgentError>;
}
