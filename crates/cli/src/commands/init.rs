use ck_core::init::{generate_crewkit_structure, InitOptions};
use colored::Colorize;
use std::path::PathBuf;

pub async fn execute(target_dir: PathBuf, force: bool, minimal: bool) -> color_eyre::Result<()> {
    let ck_dir = generate_crewkit_structure(InitOptions {
        target_dir,
        force,
        minimal,
    })
    .await?;

    println!("{} {}", "Created".green().bold(), ck_dir.display());
    println!(
        "Edit {} to point at your tool server, then run {}",
        "config.toml".cyan(),
        "crewkit run".cyan()
    );
    Ok(())
}
