//! Task configuration models for `.crewkit/tasks.yaml`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A single task definition.
///
/// `tasks.yaml` is an ordered map from task identifier to task body; the
/// identifier is stored in `name` by the loader. Document order is the
/// execution order of a sequential crew.
///
/// # Example
///
/// ```yaml
/// arxiv_research_task:
///   description: Search arXiv for the {limit} most relevant papers about {topic}.
///   expected-output: A numbered list of {limit} papers with title, authors and link.
///   agent: arxiv_research_agent
///   output-file: report.md
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, TS)]
#[serde(rename_all = "kebab-case")]
pub struct TaskConfig {
    /// Task identifier (the map key in `tasks.yaml`).
    #[serde(skip)]
    pub name: String,

    /// What the agent must do. May reference kickoff inputs as `{name}`.
    pub description: String,

    /// Description of the expected result. May reference kickoff inputs.
    pub expected_output: String,

    /// Name of the agent this task is bound to.
    pub agent: String,

    /// Optional path (relative to the project root) the task output is
    /// written to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
}
