//! Writes a `.crewkit/` directory from the embedded templates.

use super::error::{InitError, InitResult};
use super::templates::{get_template, list_templates};
use crate::config::loader::CONFIG_DIR;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Directory the `.crewkit/` folder is created in.
    pub target_dir: PathBuf,

    /// Write over an existing `.crewkit/` directory.
    pub force: bool,

    /// Only the research agent and its single task.
    pub minimal: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            target_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            force: false,
            minimal: false,
        }
    }
}

/// Generate:
///
/// ```text
/// .crewkit/
/// ├── config.toml
/// ├── agents/
/// │   ├── arxiv_research_agent.md
/// │   └── report_writer.md (unless minimal)
/// └── tasks.yaml
/// ```
pub async fn generate_crewkit_structure(options: InitOptions) -> InitResult<PathBuf> {
    let ck_dir = options.target_dir.join(CONFIG_DIR);

    if ck_dir.exists() && !options.force {
        return Err(InitError::DirectoryExists(ck_dir));
    }

    write_template(&ck_dir, "config.toml", "config.toml")?;

    if options.minimal {
        write_template(
            &ck_dir,
            "agents/arxiv_research_agent.md",
            "agents/arxiv_research_agent.md",
        )?;
        write_template(&ck_dir, "tasks.minimal.yaml", "tasks.yaml")?;
    } else {
        for agent_path in list_templates("agents/") {
            write_template(&ck_dir, &agent_path, &agent_path)?;
        }
        write_template(&ck_dir, "tasks.yaml", "tasks.yaml")?;
    }

    Ok(ck_dir)
}

fn write_template(ck_dir: &Path, template: &str, target: &str) -> InitResult<()> {
    let content =
        get_template(template).ok_or_else(|| InitError::TemplateNotFound(template.to_string()))?;

    let target_path = ck_dir.join(target);
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|source| InitError::DirectoryCreate {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(&target_path, content).map_err(|source| InitError::FileWrite {
        path: target_path.clone(),
        source,
    })?;
    debug!(path = %target_path.display(), "Wrote template");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::load_config;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_generated_structure_loads() {
        let dir = tempdir().unwrap();
        let ck_dir = generate_crewkit_structure(InitOptions {
            target_dir: dir.path().to_path_buf(),
            force: false,
            minimal: false,
        })
        .await
        .unwrap();

        assert!(ck_dir.join("config.toml").exists());
        assert!(ck_dir.join("agents/report_writer.md").exists());

        let config = load_config(dir.path()).await.unwrap();
        assert_eq!(config.global.crew.name, "arxiv-research");
        assert_eq!(config.agents.len(), 2);
        let names: Vec<&str> = config.tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["arxiv_research_task", "report_task"]);
        assert_eq!(
            config.agent("report_writer").and_then(|a| a.tools.clone()),
            Some(Vec::new())
        );
    }

    #[tokio::test]
    async fn test_minimal_structure() {
        let dir = tempdir().unwrap();
        generate_crewkit_structure(InitOptions {
            target_dir: dir.path().to_path_buf(),
            force: false,
            minimal: true,
        })
        .await
        .unwrap();

        let config = load_config(dir.path()).await.unwrap();
        assert_eq!(config.agents.len(), 1);
        assert_eq!(config.tasks.len(), 1);
        assert!(!dir.path().join(".crewkit/agents/report_writer.md").exists());
    }

    #[tokio::test]
    async fn test_existing_directory_without_force() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join(CONFIG_DIR)).unwrap();

        let result = generate_crewkit_structure(InitOptions {
            target_dir: dir.path().to_path_buf(),
            force: false,
            minimal: false,
        })
        .await;
        assert!(matches!(result, Err(InitError::DirectoryExists(_))));
    }

    #[tokio::test]
    async fn test_existing_directory_with_force() {
        let dir = tempdir().unwrap();
        let ck_dir = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(&ck_dir).unwrap();
        fs::write(ck_dir.join("config.toml"), "stale").unwrap();

        generate_crewkit_structure(InitOptions {
            target_dir: dir.path().to_path_buf(),
            force: true,
            minimal: true,
        })
        .await
        .unwrap();

        let config = fs::read_to_string(ck_dir.join("config.toml")).unwrap();
        assert!(config.contains("[crew]"));
    }

    #[test]
    fn test_default_init_options() {
        let options = InitOptions::default();
        assert!(!options.force);
        assert!(!options.minimal);
    }
}
