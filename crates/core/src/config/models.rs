//! Aggregated configuration.

use ck_protocol::agent_models::AgentConfig;
use ck_protocol::config_models::GlobalConfig;
use ck_protocol::task_models::TaskConfig;

/// Everything loaded from a `.crewkit/` directory.
///
/// - `config.toml`: global settings
/// - `agents/*.md`: agent definitions, sorted by file name
/// - `tasks.yaml`: tasks, in document order
///
/// ```rust,no_run
/// use ck_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("{} agents, {} tasks", config.agents.len(), config.tasks.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub global: GlobalConfig,
    pub agents: Vec<AgentConfig>,
    pub tasks: Vec<TaskConfig>,
}

impl AppConfig {
    pub fn agent(&self, name: &str) -> Option<&AgentConfig> {
        self.agents.iter().find(|a| a.name == name)
    }

    pub fn task(&self, name: &str) -> Option<&TaskConfig> {
        self.tasks.iter().find(|t| t.name == name)
    }
}
