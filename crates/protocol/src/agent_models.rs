//! Agent configuration models for `.crewkit/agents/*.md`.
//!
//! Agents are defined as Markdown files with YAML front matter. The front
//! matter carries the agent's identity and flags; the body is its backstory.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Represents an agent's configuration and backstory.
///
/// # Example
///
/// ```markdown
/// ---
/// name: arxiv_research_agent
/// role: arXiv Research Specialist
/// goal: Find the most relevant recent papers on {topic}
/// verbose: true
/// reasoning: true
/// tools:
///   - search_arxiv
/// ---
///
/// You are a meticulous researcher who knows how to query arXiv.
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, TS)]
pub struct AgentConfig {
    /// Unique identifier for this agent.
    ///
    /// Tasks reference their agent by this name.
    pub name: String,

    /// The agent's role, used as the first line of its persona.
    pub role: String,

    /// What the agent is trying to achieve.
    pub goal: String,

    /// Emit the runner's intermediate thoughts to the run log.
    #[serde(default)]
    pub verbose: bool,

    /// Ask the runner to plan before acting.
    #[serde(default)]
    pub reasoning: bool,

    /// Optional allowlist of tool names.
    ///
    /// When absent the agent receives every tool the adapter discovered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<String>>,

    /// The Markdown body of the file, not part of the front matter.
    #[serde(skip)]
    pub backstory: String,
}
