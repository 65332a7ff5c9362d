//! Global configuration models for `.crewkit/config.toml`.

use crate::crew_models::CrewConfig;
use crate::server_models::McpConfig;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use ts_rs::TS;

/// Represents global settings from `.crewkit/config.toml`.
///
/// # Example
///
/// ```toml
/// [crew]
/// name = "arxiv-research"
/// process = "sequential"
///
/// [mcp]
/// url = "https://mcp.obrol.id/f/sse"
/// transport = "sse"
/// on-failure = "degrade"
///
/// [runner]
/// command = "crew-runner"
/// args = ["--model", "gpt-4o-mini"]
///
/// [inputs]
/// topic = "retrieval augmented generation"
/// limit = 5
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, TS)]
pub struct GlobalConfig {
    /// Crew settings.
    #[serde(default)]
    pub crew: CrewConfig,

    /// Remote tool server. Without it the crew runs with no tools.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcp: Option<McpConfig>,

    /// External reasoning command used by the agents.
    #[serde(default)]
    pub runner: RunnerConfig,

    /// Default kickoff inputs, overridable from the command line.
    #[serde(default)]
    pub inputs: BTreeMap<String, serde_json::Value>,
}

/// The `[runner]` table.
#[derive(Serialize, Deserialize, Debug, Clone, Default, TS)]
pub struct RunnerConfig {
    /// Executable name or path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Extra arguments passed before anything crewkit adds.
    #[serde(default)]
    pub args: Vec<String>,
}
