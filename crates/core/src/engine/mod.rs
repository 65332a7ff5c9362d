//! Crew execution engine.
//!
//! Runs a crew's tasks in order, hands each one to a runner, and reports
//! progress as [`Event`]s on an mpsc channel.

use crate::agents::base::{AgentEvent, AgentRunner, ExecutionContext};
use crate::crew::{Crew, Inputs, Task};
use crate::state::run::{
    begin_task, complete_run, create_run, fail_run, log_to_run, record_output, start_run,
};
use anyhow::{anyhow, Context, Result};
use ck_protocol::ipc::Event;
use ck_protocol::run_models::{Run, TaskOutput};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc::Sender;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

/// Sequential crew executor.
pub struct CrewEngine {
    primary: Arc<dyn AgentRunner>,
    fallback: Option<Arc<dyn AgentRunner>>,
    working_dir: PathBuf,
}

impl CrewEngine {
    /// Engine that executes every task on `runner`.
    pub fn new(runner: Arc<dyn AgentRunner>) -> Self {
        Self {
            primary: runner,
            fallback: None,
            working_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Runner to use when the primary reports itself unavailable.
    pub fn with_fallback(mut self, runner: Arc<dyn AgentRunner>) -> Self {
        self.fallback = Some(runner);
        self
    }

    /// Directory runners start in and output files are written under.
    pub fn with_working_dir(mut self, working_dir: impl Into<PathBuf>) -> Self {
        self.working_dir = working_dir.into();
        self
    }

    /// Execute every task of `crew` and return the finished run.
    ///
    /// The first failing task fails the run: a `RunError` event is emitted
    /// and the error is returned. Later tasks are not executed.
    pub async fn run(&self, crew: &Crew, inputs: &Inputs, events_tx: Sender<Event>) -> Result<Run> {
        let mut run = create_run(crew.name.clone());
        start_run(&mut run, &events_tx).await;
        info!(run_id = %run.id, crew = %crew.name, tasks = crew.tasks.len(), "Run started");

        for (index, task) in crew.tasks.iter().enumerate() {
            begin_task(&mut run, &events_tx, index, &task.name, &task.agent).await;

            if let Err(e) = self
                .execute_task(&mut run, crew, task, inputs, &events_tx)
                .await
            {
                let message = format!("Task '{}' failed: {e:#}", task.name);
                warn!(run_id = %run.id, "{message}");
                fail_run(&mut run, &events_tx, message).await;
                return Err(e.context(format!("Task '{}' failed", task.name)));
            }
        }

        complete_run(&mut run, &events_tx).await;
        info!(run_id = %run.id, "Run completed");
        Ok(run)
    }

    async fn select_runner(&self) -> Result<&Arc<dyn AgentRunner>> {
        if self.primary.check_availability().await {
            return Ok(&self.primary);
        }
        match &self.fallback {
            Some(fallback) if fallback.check_availability().await => {
                warn!(
                    primary = self.primary.name(),
                    fallback = fallback.name(),
                    "Primary runner unavailable; using fallback"
                );
                Ok(fallback)
            }
            _ => Err(anyhow!(
                "Runner '{}' is not available",
                self.primary.name()
            )),
        }
    }

    async fn execute_task(
        &self,
        run: &mut Run,
        crew: &Crew,
        task: &Task,
        inputs: &Inputs,
        events_tx: &Sender<Event>,
    ) -> Result<()> {
        let agent = crew
            .agent(&task.agent)
            .ok_or_else(|| anyhow!("Unknown agent '{}'", task.agent))?
            .render(inputs)?;
        let rendered = task.render(inputs)?;
        let verbose = crew.verbose || agent.verbose;

        let context = ExecutionContext::new(agent, task.name.clone(), rendered.description)
            .with_expected_output(rendered.expected_output)
            .with_context(run.outputs.clone())
            .with_working_dir(self.working_dir.clone());

        let runner = self.select_runner().await?;
        log_to_run(
            run,
            events_tx,
            format!("Executing task '{}' with agent '{}'", task.name, task.agent),
        )
        .await;

        let mut stream = runner
            .execute(&context)
            .await
            .with_context(|| format!("Failed to start runner '{}'", runner.name()))?;

        let mut message = String::new();
        let mut final_output = None;

        while let Some(event) = stream.next().await {
            match event.map_err(|e| anyhow!("Runner error: {e}"))? {
                AgentEvent::Thought(thought) => {
                    if verbose {
                        info!(agent = %task.agent, "{thought}");
                    }
                    log_to_run(run, events_tx, format!("[Thought] {thought}")).await;
                }
                AgentEvent::ToolCall { name, arguments } => {
                    debug!(tool = %name, %arguments, "Tool call");
                    log_to_run(run, events_tx, format!("[Tool Call] {name} {arguments}")).await;
                }
                AgentEvent::ToolResult {
                    name,
                    output,
                    is_error,
                } => {
                    let _ = events_tx
                        .send(Event::ToolInvoked {
                            run_id: run.id,
                            tool: name.clone(),
                            is_error,
                        })
                        .await;
                    let label = if is_error { "Tool Error" } else { "Tool Result" };
                    log_to_run(run, events_tx, format!("[{label}] {name}: {output}")).await;
                }
                AgentEvent::MessageChunk(chunk) => {
                    message.push_str(&chunk);
                    log_to_run(run, events_tx, chunk).await;
                }
                AgentEvent::Completed { output } => {
                    final_output = Some(output.unwrap_or_else(|| message.clone()));
                    break;
                }
            }
        }

        let raw = final_output.unwrap_or_else(|| {
            warn!(task = %task.name, "Runner stream ended without completion");
            message
        });

        if let Some(file) = &rendered.output_file {
            self.write_output(file, &raw).await?;
            log_to_run(run, events_tx, format!("Wrote output to {file}")).await;
        }

        record_output(
            run,
            events_tx,
            TaskOutput {
                task: task.name.clone(),
                agent: task.agent.clone(),
                raw,
            },
        )
        .await;

        Ok(())
    }

    async fn write_output(&self, file: &str, contents: &str) -> Result<()> {
        let relative = Path::new(file);
        if relative.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        }) {
            return Err(anyhow!(
                "Output file '{file}' must be a relative path inside {}",
                self.working_dir.display()
            ));
        }

        let path = self.working_dir.join(relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        tokio::fs::write(&path, contents)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}
