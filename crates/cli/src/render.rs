//! Terminal rendering of engine events.

use ck_protocol::ipc::Event;
use colored::Colorize;
use tokio::sync::mpsc::Receiver;
use tracing::debug;

/// Print every event until the engine drops its sender.
pub async fn print_events(mut rx: Receiver<Event>) {
    while let Some(event) = rx.recv().await {
        print_event(&event);
    }
}

fn print_event(event: &Event) {
    match event {
        Event::RunStarted { run_id, crew_name } => {
            println!("{} {} ({run_id})", "Crew".bold(), crew_name.bold());
        }
        Event::RunStatusUpdate {
            status, task_index, ..
        } => {
            debug!(?status, task_index, "Status update");
        }
        Event::TaskStarted {
            task_index,
            task,
            agent,
            ..
        } => {
            println!(
                "\n{} {} {}",
                format!("[{}]", task_index + 1).cyan(),
                task.cyan().bold(),
                format!("({agent})").dimmed()
            );
        }
        Event::ToolInvoked { tool, is_error, .. } => {
            if *is_error {
                println!("  {} {}", "tool failed:".red(), tool.red());
            } else {
                println!("  {} {}", "tool:".green(), tool.green());
            }
        }
        Event::RunLogChunk { content, .. } => {
            println!("  {}", content.dimmed());
        }
        Event::TaskCompleted { output, .. } => {
            println!("{} {}", "done".green(), output.task);
        }
        Event::RunCompleted { .. } => {
            println!("\n{}", "Run completed".green().bold());
        }
        Event::RunError { error, .. } => {
            println!("\n{} {error}", "Run failed:".red().bold());
        }
    }
}
