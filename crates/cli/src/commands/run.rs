//! `crewkit run`: load the project, bracket the crew run with the tool
//! adapter, and print events as they arrive.

use crate::render;
use ck_core::agents::{AgentRunner, CommandRunner, MockRunner};
use ck_core::config::loader::load_config;
use ck_core::crew::Inputs;
use ck_core::engine::CrewEngine;
use ck_core::kickoff::{kickoff, kickoff_without_tools, merge_inputs};
use ck_core::mcp::ToolAdapter;
use color_eyre::eyre::{bail, eyre};
use colored::Colorize;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;

pub async fn execute(root: &Path, raw_inputs: &[String], mock: bool) -> color_eyre::Result<()> {
    let config = load_config(root).await?;
    let inputs = merge_inputs(&config, &parse_inputs(raw_inputs)?);

    let runner: Arc<dyn AgentRunner> = if mock {
        Arc::new(MockRunner::echo())
    } else {
        match CommandRunner::from_config(&config.global.runner) {
            Some(runner) => Arc::new(runner),
            None => {
                bail!("No runner configured: set [runner] command in config.toml or pass --mock")
            }
        }
    };
    let engine = CrewEngine::new(runner).with_working_dir(root);

    let (events_tx, events_rx) = mpsc::channel(256);
    let printer = tokio::spawn(render::print_events(events_rx));

    let result = match config.global.mcp.clone() {
        Some(mcp) => {
            let mut adapter = ToolAdapter::new(mcp.server);
            kickoff(&config, &mut adapter, &engine, &inputs, events_tx).await
        }
        None => kickoff_without_tools(&config, &engine, &inputs, events_tx).await,
    };
    let _ = printer.await;

    let run = result.map_err(|e| eyre!("{e:#}"))?;
    if let Some(output) = run.final_output() {
        println!("\n{}\n{output}", "Final output".bold());
    }
    Ok(())
}

/// Parse `key=value` pairs. Values that parse as JSON keep their type,
/// anything else is taken as a string.
fn parse_inputs(raw: &[String]) -> color_eyre::Result<Inputs> {
    let mut inputs = Inputs::new();
    for pair in raw {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("Invalid input '{pair}': expected KEY=VALUE");
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("Invalid input '{pair}': empty key");
        }
        let value =
            serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
        inputs.insert(key.to_string(), value);
    }
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_inputs() {
        let inputs = parse_inputs(&[
            "topic=graph neural networks".to_string(),
            "limit=3".to_string(),
            "query=a=b".to_string(),
        ])
        .unwrap();

        assert_eq!(inputs["topic"], json!("graph neural networks"));
        assert_eq!(inputs["limit"], json!(3));
        assert_eq!(inputs["query"], json!("a=b"));
    }

    #[test]
    fn test_parse_inputs_rejects_missing_separator() {
        assert!(parse_inputs(&["topic".to_string()]).is_err());
        assert!(parse_inputs(&["=value".to_string()]).is_err());
    }
}
