//! Agents, tasks and the sequential crew that runs them.
//!
//! Agents are built from the tool set the adapter returned, so a crew can
//! only exist after the adapter has been started.

pub mod agent;
pub mod error;
pub mod task;
pub mod template;

pub use agent::{build_agent, Agent};
pub use error::CrewError;
pub use task::{build_task, RenderedTask, Task};
pub use template::Inputs;

use crate::config::models::AppConfig;
use crate::mcp::ToolSet;
use ck_protocol::crew_models::ProcessKind;
use tracing::info;

/// Ordered tasks routed through their bound agents.
#[derive(Debug, Clone)]
pub struct Crew {
    pub name: String,
    pub process: ProcessKind,
    pub verbose: bool,
    pub agents: Vec<Agent>,
    pub tasks: Vec<Task>,
}

impl Crew {
    pub fn agent(&self, name: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.name == name)
    }
}

/// Assemble the configured crew over `tools`.
pub fn build_crew(config: &AppConfig, tools: &ToolSet) -> Result<Crew, CrewError> {
    let crew_config = &config.global.crew;
    if crew_config.process != ProcessKind::Sequential {
        return Err(CrewError::UnsupportedProcess(crew_config.process));
    }
    if config.tasks.is_empty() {
        return Err(CrewError::NoTasks);
    }

    let agents: Vec<Agent> = config
        .agents
        .iter()
        .map(|agent| build_agent(agent, tools))
        .collect();
    let tasks: Vec<Task> = config.tasks.iter().map(build_task).collect();

    if let Some(orphan) = tasks
        .iter()
        .find(|task| !agents.iter().any(|a| a.name == task.agent))
    {
        return Err(CrewError::UnknownAgent {
            task: orphan.name.clone(),
            agent: orphan.agent.clone(),
        });
    }

    info!(
        crew = %crew_config.name,
        agents = agents.len(),
        tasks = tasks.len(),
        tools = tools.len(),
        "Crew assembled"
    );

    Ok(Crew {
        name: crew_config.name.clone(),
        process: crew_config.process,
        verbose: crew_config.verbose,
        agents,
        tasks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ck_protocol::agent_models::AgentConfig;
    use ck_protocol::task_models::TaskConfig;

    fn app_config(agent: &str, task_agent: &str) -> AppConfig {
        let mut config = AppConfig::default();
        config.agents.push(AgentConfig {
            name: agent.to_string(),
            role: "Researcher".to_string(),
            goal: "Find papers".to_string(),
            verbose: false,
            reasoning: true,
            tools: None,
            backstory: String::new(),
        });
        config.tasks.push(TaskConfig {
            name: "search_task".to_string(),
            description: "Search".to_string(),
            expected_output: "Papers".to_string(),
            agent: task_agent.to_string(),
            output_file: None,
        });
        config
    }

    #[test]
    fn test_build_crew() {
        let crew = build_crew(&app_config("researcher", "researcher"), &ToolSet::default())
            .expect("crew should build");
        assert_eq!(crew.name, "crew");
        assert_eq!(crew.tasks.len(), 1);
        assert!(crew.agent("researcher").is_some_and(|a| a.reasoning));
    }

    #[test]
    fn test_unknown_agent() {
        let err = build_crew(&app_config("researcher", "writer"), &ToolSet::default())
            .expect_err("task agent does not exist");
        assert_eq!(
            err,
            CrewError::UnknownAgent {
                task: "search_task".to_string(),
                agent: "writer".to_string(),
            }
        );
    }

    #[test]
    fn test_no_tasks() {
        let mut config = app_config("researcher", "researcher");
        config.tasks.clear();
        assert_eq!(
            build_crew(&config, &ToolSet::default()).unwrap_err(),
            CrewError::NoTasks
        );
    }

    #[test]
    fn test_hierarchical_rejected() {
        let mut config = app_config("researcher", "researcher");
        config.global.crew.process = ProcessKind::Hierarchical;
        assert_eq!(
            build_crew(&config, &ToolSet::default()).unwrap_err(),
            CrewError::UnsupportedProcess(ProcessKind::Hierarchical)
        );
    }
}
