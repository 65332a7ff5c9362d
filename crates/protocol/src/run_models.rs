//! Runtime run state models.
//!
//! This module defines the structures for tracking the state of a crew
//! execution ("run").

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Lifecycle status of a run.
///
/// Pending -> Running -> Completed | Failed
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    /// Run has been created but not started yet.
    Pending,

    /// Run is actively executing tasks.
    Running,

    /// Every task finished.
    Completed,

    /// A task failed; later tasks were not executed.
    Failed,
}

/// Output of one finished task.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct TaskOutput {
    /// Task identifier.
    pub task: String,

    /// Agent that executed the task.
    pub agent: String,

    /// Concatenated message output of the runner.
    pub raw: String,
}

/// Runtime state of a single crew execution.
#[derive(Serialize, Deserialize, Debug, Clone, TS)]
pub struct Run {
    /// Unique identifier for this run.
    #[ts(type = "string")]
    pub id: Uuid,

    /// Name of the crew being executed.
    pub crew_name: String,

    /// Current execution status.
    pub status: RunStatus,

    /// Zero-based index of the task currently executing, or the last one
    /// executed once the run is terminal.
    pub current_task: usize,

    /// Accumulated log messages.
    pub logs: Vec<String>,

    /// Outputs of finished tasks, in execution order.
    pub outputs: Vec<TaskOutput>,
}

impl Run {
    /// Raw output of the last finished task.
    pub fn final_output(&self) -> Option<&str> {
        self.outputs.last().map(|output| output.raw.as_str())
    }
}
