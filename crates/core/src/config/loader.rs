//! Loader for the `.crewkit/` directory.
//!
//! - `config.toml`: global settings
//! - `agents/*.md`: agent definitions with YAML front matter; the Markdown
//!   body is the agent's backstory
//! - `tasks.yaml` (or `tasks.yml`): map of task id to task definition, kept
//!   in document order

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::models::AppConfig;
use ck_protocol::agent_models::AgentConfig;
use ck_protocol::config_models::GlobalConfig;
use ck_protocol::task_models::TaskConfig;
use gray_matter::engine::YAML;
use gray_matter::Matter;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Name of the configuration directory under a project root.
pub const CONFIG_DIR: &str = ".crewkit";

/// Load all configuration under `root/.crewkit`.
///
/// A missing directory or missing files yield defaults rather than errors.
/// Files that exist but do not parse are errors.
pub async fn load_config(root: &Path) -> ConfigResult<AppConfig> {
    let ck_dir = root.join(CONFIG_DIR);

    if !ck_dir.exists() {
        debug!(path = %ck_dir.display(), "No configuration directory; using defaults");
        return Ok(AppConfig::default());
    }

    let global = load_global_config(&ck_dir)?;
    let agents = load_agents(&ck_dir)?;
    let tasks = load_tasks(&ck_dir)?;

    debug!(
        agents = agents.len(),
        tasks = tasks.len(),
        "Loaded configuration"
    );

    Ok(AppConfig {
        global,
        agents,
        tasks,
    })
}

fn read(path: &Path) -> ConfigResult<String> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

fn load_global_config(ck_dir: &Path) -> ConfigResult<GlobalConfig> {
    let config_path = ck_dir.join("config.toml");

    if !config_path.exists() {
        return Ok(GlobalConfig::default());
    }

    let content = read(&config_path)?;
    toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
        path: config_path,
        source,
    })
}

fn load_agents(ck_dir: &Path) -> ConfigResult<Vec<AgentConfig>> {
    let agents_dir = ck_dir.join("agents");

    if !agents_dir.exists() {
        return Ok(Vec::new());
    }

    let mut agents = Vec::new();
    let mut seen = HashSet::new();

    for entry in WalkDir::new(&agents_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| ConfigError::DirectoryWalk {
            path: agents_dir.clone(),
            source,
        })?;

        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("md") {
            continue;
        }

        let agent = parse_agent(path, &read(path)?)?;
        if !seen.insert(agent.name.clone()) {
            return Err(ConfigError::InvalidConfig {
                path: path.to_path_buf(),
                reason: format!("Duplicate agent name '{}'", agent.name),
            });
        }
        agents.push(agent);
    }

    Ok(agents)
}

fn parse_agent(path: &Path, content: &str) -> ConfigResult<AgentConfig> {
    let matter = Matter::<YAML>::new();
    let result = matter.parse(content);

    let mut agent: AgentConfig = result
        .data
        .ok_or_else(|| ConfigError::MarkdownParse {
            path: path.to_path_buf(),
            reason: "Missing YAML front matter".to_string(),
        })?
        .deserialize()
        .map_err(|e| ConfigError::MarkdownParse {
            path: path.to_path_buf(),
            reason: format!("Failed to deserialize front matter: {e}"),
        })?;

    agent.backstory = result.content.trim().to_string();
    Ok(agent)
}

fn tasks_path(ck_dir: &Path) -> Option<PathBuf> {
    ["tasks.yaml", "tasks.yml"]
        .iter()
        .map(|name| ck_dir.join(name))
        .find(|path| path.exists())
}

fn load_tasks(ck_dir: &Path) -> ConfigResult<Vec<TaskConfig>> {
    let Some(path) = tasks_path(ck_dir) else {
        return Ok(Vec::new());
    };

    let content = read(&path)?;
    let document: serde_yaml::Value =
        serde_yaml::from_str(&content).map_err(|source| ConfigError::YamlParse {
            path: path.clone(),
            source,
        })?;

    let mapping = match document {
        serde_yaml::Value::Null => return Ok(Vec::new()),
        serde_yaml::Value::Mapping(mapping) => mapping,
        _ => {
            return Err(ConfigError::InvalidConfig {
                path,
                reason: "Expected a map of task id to task definition".to_string(),
            })
        }
    };

    // serde_yaml::Mapping preserves insertion order, which is execution order.
    let mut tasks = Vec::with_capacity(mapping.len());
    for (key, value) in mapping {
        let name = key
            .as_str()
            .ok_or_else(|| ConfigError::InvalidConfig {
                path: path.clone(),
                reason: format!("Task id must be a string, got {key:?}"),
            })?
            .to_string();

        let mut task: TaskConfig =
            serde_yaml::from_value(value).map_err(|source| ConfigError::YamlParse {
                path: path.clone(),
                source,
            })?;
        task.name = name;
        tasks.push(task);
    }

    Ok(tasks)
}
