//! `crewkit` command-line entry point.

mod commands;
mod render;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Run a sequential research crew against a remote MCP tool server.
#[derive(Parser, Debug)]
#[command(name = "crewkit", author, version, about)]
struct Args {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a `.crewkit/` directory from the bundled templates
    Init {
        /// Directory to create `.crewkit/` in (defaults to the current directory)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Overwrite an existing `.crewkit/` directory
        #[arg(long)]
        force: bool,

        /// Only the research agent and its task
        #[arg(long)]
        minimal: bool,
    },

    /// Connect to the configured tool server and list its tools
    Tools {
        /// Project root containing `.crewkit/`
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Kick off the crew
    Run {
        /// Project root containing `.crewkit/`
        #[arg(long)]
        root: Option<PathBuf>,

        /// Input override, `key=value` (repeatable)
        #[arg(short, long = "input", value_name = "KEY=VALUE")]
        inputs: Vec<String>,

        /// Answer tasks with the built-in mock runner
        #[arg(long)]
        mock: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_root(root: Option<PathBuf>) -> color_eyre::Result<PathBuf> {
    match root {
        Some(root) => Ok(root),
        None => Ok(std::env::current_dir()?),
    }
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_tracing(args.verbose);

    match args.command {
        Command::Init {
            root,
            force,
            minimal,
        } => commands::init::execute(resolve_root(root)?, force, minimal).await,
        Command::Tools { root } => commands::tools::execute(&resolve_root(root)?).await,
        Command::Run { root, inputs, mock } => {
            commands::run::execute(&resolve_root(root)?, &inputs, mock).await
        }
    }
}
