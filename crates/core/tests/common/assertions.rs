//! Assertions over emitted events.

use ck_protocol::ipc::Event;
use ck_protocol::run_models::RunStatus;

#[allow(dead_code)]
pub fn has_status_update(events: &[Event], status: RunStatus) -> bool {
    events.iter().any(|e| {
        matches!(
            e,
            Event::RunStatusUpdate { status: s, .. } if *s == status
        )
    })
}

/// Tools reported through `ToolInvoked`, in order, with their error flag.
#[allow(dead_code)]
pub fn invoked_tools(events: &[Event]) -> Vec<(String, bool)> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::ToolInvoked { tool, is_error, .. } => Some((tool.clone(), *is_error)),
            _ => None,
        })
        .collect()
}

/// `RunStarted` first, a terminal event last.
#[allow(dead_code)]
pub fn assert_event_sequence(events: &[Event]) {
    assert!(!events.is_empty(), "Event sequence is empty");
    assert!(
        matches!(events[0], Event::RunStarted { .. }),
        "First event should be RunStarted, got: {:?}",
        events[0]
    );
    assert!(
        matches!(
            events.last(),
            Some(Event::RunCompleted { .. } | Event::RunError { .. })
        ),
        "Last event should be terminal, got: {:?}",
        events.last()
    );
}
