//! Agent descriptors.

use crate::crew::error::CrewError;
use crate::crew::template::{interpolate, Inputs};
use crate::mcp::ToolSet;
use ck_protocol::agent_models::AgentConfig;
use tracing::debug;

/// A configured reasoning entity and the tools it may call.
#[derive(Debug, Clone)]
pub struct Agent {
    pub name: String,
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub verbose: bool,
    pub reasoning: bool,
    pub tools: ToolSet,
}

impl Agent {
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.names()
    }

    /// Copy with `{placeholders}` in role, goal and backstory filled in.
    pub fn render(&self, inputs: &Inputs) -> Result<Agent, CrewError> {
        let fill = |text: &str| {
            interpolate(text, inputs).map_err(|name| CrewError::MissingInput {
                owner: self.name.clone(),
                name,
            })
        };

        Ok(Agent {
            role: fill(&self.role)?,
            goal: fill(&self.goal)?,
            backstory: fill(&self.backstory)?,
            ..self.clone()
        })
    }
}

/// Build an agent over `tools`, the set returned by the tool adapter.
///
/// Without a `tools` allowlist the agent shares `tools` as is; with one it
/// gets the allowed subset.
pub fn build_agent(config: &AgentConfig, tools: &ToolSet) -> Agent {
    let tools = match &config.tools {
        Some(allowed) => tools.filter(allowed),
        None => tools.clone(),
    };

    debug!(agent = %config.name, tools = ?tools.names(), "Built agent");

    Agent {
        name: config.name.clone(),
        role: config.role.clone(),
        goal: config.goal.clone(),
        backstory: config.backstory.clone(),
        verbose: config.verbose,
        reasoning: config.reasoning,
        tools,
    }
}
