//! `crewkit tools`: start the adapter, print what it produced, stop it.

use ck_core::config::loader::load_config;
use ck_core::mcp::{StartOutcome, ToolAdapter};
use color_eyre::eyre::eyre;
use colored::Colorize;
use std::path::Path;

pub async fn execute(root: &Path) -> color_eyre::Result<()> {
    let config = load_config(root).await?;
    let Some(mcp) = config.global.mcp else {
        println!("No tool server configured ([mcp] is missing from config.toml)");
        return Ok(());
    };

    let mut adapter = ToolAdapter::new(mcp.server);
    let outcome = adapter.start().await;
    let url = adapter.params().url.clone();

    let result = match &outcome {
        StartOutcome::Connected { tools } => {
            println!("{} {url}", "Connected to".green().bold());
            if tools.is_empty() {
                println!("  (no tools)");
            }
            for descriptor in tools.descriptors() {
                match descriptor.description.as_deref() {
                    Some(description) if !description.is_empty() => {
                        println!("  {} {}", descriptor.name.cyan(), description.dimmed())
                    }
                    _ => println!("  {}", descriptor.name.cyan()),
                }
            }
            Ok(())
        }
        StartOutcome::Failed { reason, .. } => {
            Err(eyre!("Tool server at {url} is unavailable: {reason}"))
        }
    };

    adapter.stop().await;
    result
}
