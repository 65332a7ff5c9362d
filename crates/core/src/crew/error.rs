use ck_protocol::crew_models::ProcessKind;
use thiserror::Error;

/// Errors raised while assembling a crew or rendering its prompts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CrewError {
    #[error("Task '{task}' is assigned to unknown agent '{agent}'")]
    UnknownAgent { task: String, agent: String },

    #[error("Crew has no tasks")]
    NoTasks,

    #[error("Process {0:?} is not supported; only sequential crews can run")]
    UnsupportedProcess(ProcessKind),

    #[error("'{owner}' references input '{{{name}}}' but no such input was provided")]
    MissingInput { owner: String, name: String },
}
