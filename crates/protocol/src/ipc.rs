//! Events emitted by the crew engine.
//!
//! The engine reports progress through an asynchronous channel so that a
//! front end (the CLI today) can render it while the run continues.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::run_models::{RunStatus, TaskOutput};

/// Status updates sent from the engine to the front end.
///
/// Uses tagged enum serialization for TypeScript compatibility:
/// ```json
/// {
///   "type": "runStatusUpdate",
///   "payload": {
///     "run_id": "uuid-here",
///     "status": "RUNNING",
///     "task_index": 0
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Event {
    /// A new run has been started.
    RunStarted {
        #[ts(type = "string")]
        run_id: Uuid,
        crew_name: String,
    },

    /// A run's status has changed.
    RunStatusUpdate {
        #[ts(type = "string")]
        run_id: Uuid,
        status: RunStatus,
        task_index: usize,
    },

    /// A task has been handed to its agent.
    TaskStarted {
        #[ts(type = "string")]
        run_id: Uuid,
        task_index: usize,
        task: String,
        agent: String,
    },

    /// An agent invoked a remote tool.
    ToolInvoked {
        #[ts(type = "string")]
        run_id: Uuid,
        tool: String,
        is_error: bool,
    },

    /// A run has produced new log output.
    RunLogChunk {
        #[ts(type = "string")]
        run_id: Uuid,
        content: String,
    },

    /// A task finished and produced output.
    TaskCompleted {
        #[ts(type = "string")]
        run_id: Uuid,
        task_index: usize,
        output: TaskOutput,
    },

    /// Every task of the run finished.
    RunCompleted {
        #[ts(type = "string")]
        run_id: Uuid,
    },

    /// A run has encountered an error.
    RunError {
        #[ts(type = "string")]
        run_id: Uuid,
        error: String,
    },
}
