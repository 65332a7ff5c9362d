//! Adapter-bracketed crew run.
//!
//! `kickoff` is the whole lifecycle in one call: start the tool adapter,
//! decide whether a failed start is fatal, build the crew from whatever tool
//! set the adapter produced, run it, and stop the adapter on every path.

use crate::config::models::AppConfig;
use crate::crew::{build_crew, Inputs};
use crate::engine::CrewEngine;
use crate::mcp::{StartOutcome, ToolAdapter, ToolSet};
use anyhow::{anyhow, Result};
use ck_protocol::ipc::Event;
use ck_protocol::run_models::Run;
use ck_protocol::server_models::FailurePolicy;
use tokio::sync::mpsc::Sender;
use tracing::{info, warn};

/// Merge configured default inputs with caller overrides. Overrides win.
pub fn merge_inputs(config: &AppConfig, overrides: &Inputs) -> Inputs {
    let mut inputs = config.global.inputs.clone();
    inputs.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    inputs
}

/// Failure policy configured for the tool server, `Degrade` when the
/// `[mcp]` section is absent.
pub fn failure_policy(config: &AppConfig) -> FailurePolicy {
    config
        .global
        .mcp
        .as_ref()
        .map(|mcp| mcp.on_failure)
        .unwrap_or_default()
}

/// Start `adapter`, run the configured crew with `inputs`, stop `adapter`.
pub async fn kickoff(
    config: &AppConfig,
    adapter: &mut ToolAdapter,
    engine: &CrewEngine,
    inputs: &Inputs,
    events_tx: Sender<Event>,
) -> Result<Run> {
    let result = run_with_adapter(config, adapter, engine, inputs, events_tx).await;
    adapter.stop().await;
    result
}

async fn run_with_adapter(
    config: &AppConfig,
    adapter: &mut ToolAdapter,
    engine: &CrewEngine,
    inputs: &Inputs,
    events_tx: Sender<Event>,
) -> Result<Run> {
    let tools = match adapter.start().await {
        StartOutcome::Connected { tools } => tools,
        StartOutcome::Failed { reason, tools } => match failure_policy(config) {
            FailurePolicy::Abort => {
                return Err(anyhow!(reason).context(format!(
                    "Tool server at {} is unavailable",
                    adapter.params().url
                )));
            }
            FailurePolicy::Degrade => {
                warn!(
                    error = %reason,
                    tools = tools.len(),
                    "Continuing without the tool server"
                );
                tools
            }
        },
    };

    let crew = build_crew(config, &tools)?;
    info!(crew = %crew.name, tools = ?tools.names(), "Kicking off crew");
    engine.run(&crew, inputs, events_tx).await
}

/// Run the crew with no tool server configured.
pub async fn kickoff_without_tools(
    config: &AppConfig,
    engine: &CrewEngine,
    inputs: &Inputs,
    events_tx: Sender<Event>,
) -> Result<Run> {
    let crew = build_crew(config, &ToolSet::default())?;
    engine.run(&crew, inputs, events_tx).await
}
