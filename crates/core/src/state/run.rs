//! Run state transitions.
//!
//! Each transition mutates the [`Run`] and reports it on the event channel.
//! A closed channel is not an error; the run continues without a listener.

use ck_protocol::ipc::Event;
use ck_protocol::run_models::{Run, RunStatus, TaskOutput};
use tokio::sync::mpsc::Sender;
use uuid::Uuid;

/// New run in `Pending` status.
pub fn create_run(crew_name: impl Into<String>) -> Run {
    Run {
        id: Uuid::new_v4(),
        crew_name: crew_name.into(),
        status: RunStatus::Pending,
        current_task: 0,
        logs: Vec::new(),
        outputs: Vec::new(),
    }
}

async fn send_status(run: &Run, events_tx: &Sender<Event>) {
    let _ = events_tx
        .send(Event::RunStatusUpdate {
            run_id: run.id,
            status: run.status,
            task_index: run.current_task,
        })
        .await;
}

/// Emit `RunStarted` and move to `Running`.
pub async fn start_run(run: &mut Run, events_tx: &Sender<Event>) {
    let _ = events_tx
        .send(Event::RunStarted {
            run_id: run.id,
            crew_name: run.crew_name.clone(),
        })
        .await;
    run.status = RunStatus::Running;
    send_status(run, events_tx).await;
}

/// Point the run at task `index` and announce it.
pub async fn begin_task(
    run: &mut Run,
    events_tx: &Sender<Event>,
    index: usize,
    task: &str,
    agent: &str,
) {
    run.current_task = index;
    let _ = events_tx
        .send(Event::TaskStarted {
            run_id: run.id,
            task_index: index,
            task: task.to_string(),
            agent: agent.to_string(),
        })
        .await;
}

/// Record a finished task's output.
pub async fn record_output(run: &mut Run, events_tx: &Sender<Event>, output: TaskOutput) {
    run.outputs.push(output.clone());
    let _ = events_tx
        .send(Event::TaskCompleted {
            run_id: run.id,
            task_index: run.current_task,
            output,
        })
        .await;
}

/// Append a log line.
pub async fn log_to_run(run: &mut Run, events_tx: &Sender<Event>, message: String) {
    run.logs.push(message.clone());
    let _ = events_tx
        .send(Event::RunLogChunk {
            run_id: run.id,
            content: message,
        })
        .await;
}

pub async fn complete_run(run: &mut Run, events_tx: &Sender<Event>) {
    run.status = RunStatus::Completed;
    send_status(run, events_tx).await;
    let _ = events_tx.send(Event::RunCompleted { run_id: run.id }).await;
}

pub async fn fail_run(run: &mut Run, events_tx: &Sender<Event>, error: String) {
    run.status = RunStatus::Failed;
    run.logs.push(error.clone());
    send_status(run, events_tx).await;
    let _ = events_tx
        .send(Event::RunError {
            run_id: run.id,
            error,
        })
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_create_run() {
        let run = create_run("arxiv-research");
        assert_eq!(run.crew_name, "arxiv-research");
        assert_eq!(run.status, RunStatus::Pending);
        assert_eq!(run.current_task, 0);
        assert!(run.logs.is_empty());
        assert!(run.outputs.is_empty());
    }

    #[tokio::test]
    async fn test_start_run_emits_started_then_running() {
        let mut run = create_run("crew");
        let (tx, mut rx) = mpsc::channel(10);

        start_run(&mut run, &tx).await;

        assert_eq!(run.status, RunStatus::Running);
        assert!(matches!(rx.recv().await.unwrap(), Event::RunStarted { .. }));
        assert!(matches!(
            rx.recv().await.unwrap(),
            Event::RunStatusUpdate {
                status: RunStatus::Running,
                task_index: 0,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_record_output_uses_current_task() {
        let mut run = create_run("crew");
        let (tx, mut rx) = mpsc::channel(10);

        begin_task(&mut run, &tx, 2, "summarise", "writer").await;
        let _ = rx.recv().await;

        let output = TaskOutput {
            task: "summarise".to_string(),
            agent: "writer".to_string(),
            raw: "done".to_string(),
        };
        record_output(&mut run, &tx, output).await;

        assert_eq!(run.final_output(), Some("done"));
        match rx.recv().await.unwrap() {
            Event::TaskCompleted { task_index, output, .. } => {
                assert_eq!(task_index, 2);
                assert_eq!(output.agent, "writer");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fail_run() {
        let mut run = create_run("crew");
        let (tx, mut rx) = mpsc::channel(10);

        fail_run(&mut run, &tx, "runner crashed".to_string()).await;

        assert_eq!(run.status, RunStatus::Failed);
        assert_eq!(run.logs, vec!["runner crashed"]);
        assert!(matches!(
            rx.recv().await.unwrap(),
            Event::RunStatusUpdate {
                status: RunStatus::Failed,
                ..
            }
        ));
        match rx.recv().await.unwrap() {
            Event::RunError { error, .. } => assert_eq!(error, "runner crashed"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transitions_survive_closed_channel() {
        let mut run = create_run("crew");
        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        start_run(&mut run, &tx).await;
        log_to_run(&mut run, &tx, "still logged".to_string()).await;
        complete_run(&mut run, &tx).await;

        assert_eq!(run.status, RunStatus::Completed);
        assert_eq!(run.logs, vec!["still logged"]);
    }
}
