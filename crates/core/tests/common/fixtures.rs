//! Test fixtures.

use ck_core::config::models::AppConfig;
use ck_core::mcp::{ScriptedConnector, ToolAdapter};
use ck_protocol::agent_models::AgentConfig;
use ck_protocol::ipc::Event;
use ck_protocol::server_models::{FailurePolicy, McpConfig, ServerParams};
use ck_protocol::task_models::TaskConfig;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc;

pub const EXAMPLE_URL: &str = "https://example.test/sse";
pub const ARXIV_TOOLS: [&str; 2] = ["search_arxiv", "fetch_abstract"];

pub fn example_params() -> ServerParams {
    ServerParams::sse(EXAMPLE_URL)
}

/// Adapter over an in-memory server advertising the arXiv tools.
#[allow(dead_code)]
pub fn arxiv_adapter() -> (ToolAdapter, ScriptedConnector) {
    adapter_with(ScriptedConnector::with_tool_names(&ARXIV_TOOLS))
}

#[allow(dead_code)]
pub fn adapter_with(connector: ScriptedConnector) -> (ToolAdapter, ScriptedConnector) {
    let adapter = ToolAdapter::with_connector(example_params(), Arc::new(connector.clone()));
    (adapter, connector)
}

#[allow(dead_code)]
pub fn agent_config(name: &str, tools: Option<&[&str]>) -> AgentConfig {
    AgentConfig {
        name: name.to_string(),
        role: format!("{name} for {{topic}}"),
        goal: "Find the {limit} best papers".to_string(),
        verbose: false,
        reasoning: true,
        tools: tools.map(|names| names.iter().map(|n| n.to_string()).collect()),
        backstory: "Reads arXiv every morning.".to_string(),
    }
}

#[allow(dead_code)]
pub fn task_config(name: &str, agent: &str, output_file: Option<&str>) -> TaskConfig {
    TaskConfig {
        name: name.to_string(),
        description: format!("{name}: search arXiv for {{limit}} papers on {{topic}}"),
        expected_output: "A list of {limit} papers".to_string(),
        agent: agent.to_string(),
        output_file: output_file.map(str::to_string),
    }
}

/// One research agent, one task, `[mcp]` pointing at the example URL.
#[allow(dead_code)]
pub fn research_config(on_failure: FailurePolicy) -> AppConfig {
    let mut config = AppConfig::default();
    config.global.crew.name = "arxiv-research".to_string();
    config.global.mcp = Some(McpConfig {
        server: example_params(),
        on_failure,
    });
    config
        .global
        .inputs
        .insert("topic".to_string(), serde_json::json!("graph neural networks"));
    config
        .global
        .inputs
        .insert("limit".to_string(), serde_json::json!(3));
    config.agents.push(agent_config("arxiv_research_agent", None));
    config
        .tasks
        .push(task_config("arxiv_research_task", "arxiv_research_agent", None));
    config
}

/// Temporary project with a `.crewkit/` directory.
#[allow(dead_code)]
pub fn create_test_project() -> std::io::Result<TempDir> {
    let temp_dir = tempfile::tempdir()?;
    let ck_dir = temp_dir.path().join(".crewkit");
    std::fs::create_dir_all(ck_dir.join("agents"))?;

    std::fs::write(
        ck_dir.join("config.toml"),
        format!(
            r#"[crew]
name = "arxiv-research"

[mcp]
url = "{EXAMPLE_URL}"

[inputs]
topic = "graph-neural-networks"
limit = 3
"#
        ),
    )?;
    std::fs::write(
        ck_dir.join("agents/arxiv_research_agent.md"),
        r#"---
name: arxiv_research_agent
role: Researcher of {topic}
goal: Find {limit} papers
reasoning: true
---
Careful reader."#,
    )?;
    std::fs::write(
        ck_dir.join("tasks.yaml"),
        r#"arxiv_research_task:
  description: Search arXiv for {limit} papers on {topic}.
  expected-output: A list.
  agent: arxiv_research_agent
  output-file: out/{topic}.md
"#,
    )?;

    Ok(temp_dir)
}

/// Collect every event once the sender side has been dropped.
#[allow(dead_code)]
pub async fn drain(mut rx: mpsc::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}
