use std::time::Duration;

use pretty_assertions::assert_eq;
use transfer_core::{
    render, update, Cycle, DisplayCommand, Effect, Lifecycle, Msg, Outcome, Phase, PollerState,
    ProgressSnapshot, StatusLine, TRANSPORT_ERROR_MESSAGE,
};

fn init_logging() {
    transfer_logging::initialize_for_tests();
}

fn polling_with_timer_armed() -> PollerState {
    let (state, _) = update(PollerState::new(), Msg::StartClicked);
    let generation = state.generation();
    let (state, _) = update(
        state,
        Msg::SnapshotReceived {
            generation,
            snapshot: ProgressSnapshot::running(2, 8, "copying"),
        },
    );
    assert_eq!(state.phase(), Phase::Polling(Cycle::Scheduled));
    state
}

#[test]
fn transport_failure_is_terminal_and_keeps_bar() {
    init_logging();
    let state = polling_with_timer_armed();
    let generation = state.generation();
    let (state, _) = update(state, Msg::PollTimerFired { generation });

    let (mut state, effects) = update(state, Msg::PollFailed { generation });
    let view = state.view();

    assert!(effects.is_empty());
    assert_eq!(state.lifecycle(), Lifecycle::Failed);
    assert_eq!(view.status, StatusLine::TransportError);
    assert_eq!(view.status.to_html(), TRANSPORT_ERROR_MESSAGE);
    assert_eq!(view.bar_percent, 25.0);
    assert!(view.progress_visible);
    assert!(!view.start_disabled);
    assert!(state.consume_dirty());

    // Nothing revives a failed poller except a new start.
    let (state, effects) = update(state, Msg::PollTimerFired { generation });
    assert!(effects.is_empty());
    assert_eq!(state.lifecycle(), Lifecycle::Failed);
}

#[test]
fn start_after_failure_opens_new_generation() {
    init_logging();
    let (state, _) = update(PollerState::new(), Msg::StartClicked);
    let (state, _) = update(state, Msg::PollFailed { generation: 1 });

    let (state, effects) = update(state, Msg::StartClicked);
    assert_eq!(state.generation(), 2);
    assert_eq!(state.interval(), Duration::from_millis(150));
    assert_eq!(state.last_current(), None);
    assert_eq!(
        effects,
        vec![
            Effect::RunJob { generation: 2 },
            Effect::RequestStatus { generation: 2 },
        ]
    );
}

#[test]
fn start_while_polling_is_ignored() {
    init_logging();
    let state = polling_with_timer_armed();
    let before = state.clone();

    let (state, effects) = update(state, Msg::StartClicked);
    assert!(effects.is_empty());
    assert_eq!(state, before);

    let (state, effects) = update(state, Msg::Attach);
    assert!(effects.is_empty());
    assert_eq!(state, before);
}

#[test]
fn abort_outside_polling_is_ignored() {
    init_logging();
    let (state, effects) = update(PollerState::new(), Msg::AbortClicked);
    assert!(effects.is_empty());
    assert_eq!(state.lifecycle(), Lifecycle::Idle);

    let (state, _) = update(state, Msg::StartClicked);
    let (state, _) = update(
        state,
        Msg::SnapshotReceived {
            generation: 1,
            snapshot: ProgressSnapshot::finished("Import complete"),
        },
    );
    let (state, effects) = update(state, Msg::AbortClicked);
    assert!(effects.is_empty());
    assert_eq!(state.lifecycle(), Lifecycle::Done);
}

#[test]
fn abort_clears_status_hides_progress_and_cancels_timer() {
    init_logging();
    let state = polling_with_timer_armed();

    let (state, effects) = update(state, Msg::AbortClicked);
    assert_eq!(effects, vec![Effect::RequestAbort { generation: 1 }]);
    assert_eq!(state.lifecycle(), Lifecycle::Aborting);

    let (mut state, effects) = update(state, Msg::AbortCompleted { generation: 1 });
    let view = state.view();

    assert_eq!(effects, vec![Effect::CancelScheduledPoll]);
    assert_eq!(state.lifecycle(), Lifecycle::Idle);
    assert!(!state.is_running());
    assert_eq!(view.status, StatusLine::Empty);
    assert!(!view.progress_visible);
    assert!(!view.abort_visible);
    assert!(!view.start_disabled);
    assert!(state.consume_dirty());
    assert_eq!(
        render(&view),
        vec![
            DisplayCommand::HideProgress,
            DisplayCommand::SetProgressBarWidth(0.0),
            DisplayCommand::SetStatusHtml(String::new()),
            DisplayCommand::SetStartDisabled(false),
            DisplayCommand::SetAbortVisible(false),
        ]
    );
}

#[test]
fn polling_continues_until_abort_completes() {
    init_logging();
    let state = polling_with_timer_armed();
    let (state, _) = update(state, Msg::AbortClicked);

    let (state, effects) = update(state, Msg::PollTimerFired { generation: 1 });
    assert_eq!(effects, vec![Effect::RequestStatus { generation: 1 }]);
    assert_eq!(state.phase(), Phase::Aborting(Cycle::InFlight));

    let (state, effects) = update(
        state,
        Msg::SnapshotReceived {
            generation: 1,
            snapshot: ProgressSnapshot::running(3, 8, "copying"),
        },
    );
    assert_eq!(effects.len(), 1);
    assert_eq!(state.phase(), Phase::Aborting(Cycle::Scheduled));
}

#[test]
fn abort_completing_after_failure_still_resets() {
    init_logging();
    let state = polling_with_timer_armed();
    let (state, _) = update(state, Msg::AbortClicked);
    let (state, _) = update(state, Msg::PollTimerFired { generation: 1 });

    let (state, _) = update(state, Msg::PollFailed { generation: 1 });
    assert_eq!(state.phase(), Phase::Terminal(Outcome::Failed));
    assert_eq!(state.lifecycle(), Lifecycle::Aborting);
    assert!(state.abort_pending());
    assert_eq!(state.view().status, StatusLine::TransportError);

    let (mut state, effects) = update(state, Msg::AbortCompleted { generation: 1 });
    let view = state.view();

    assert_eq!(effects, vec![Effect::CancelScheduledPoll]);
    assert_eq!(state.lifecycle(), Lifecycle::Idle);
    assert!(!state.abort_pending());
    assert_eq!(view.status, StatusLine::Empty);
    assert!(!view.progress_visible);
    assert!(state.consume_dirty());
}

#[test]
fn abort_completing_after_done_still_resets() {
    init_logging();
    let state = polling_with_timer_armed();
    let (state, _) = update(state, Msg::AbortClicked);
    let (state, _) = update(state, Msg::PollTimerFired { generation: 1 });
    let (state, _) = update(
        state,
        Msg::SnapshotReceived {
            generation: 1,
            snapshot: ProgressSnapshot::finished("Import complete"),
        },
    );
    assert_eq!(state.lifecycle(), Lifecycle::Aborting);

    let (state, effects) = update(state, Msg::AbortCompleted { generation: 1 });
    assert_eq!(effects, vec![Effect::CancelScheduledPoll]);
    assert_eq!(state.lifecycle(), Lifecycle::Idle);
    assert_eq!(state.view().status, StatusLine::Empty);
}

#[test]
fn restart_before_abort_returns_drops_its_completion() {
    init_logging();
    let state = polling_with_timer_armed();
    let (state, _) = update(state, Msg::AbortClicked);
    let (state, _) = update(state, Msg::PollTimerFired { generation: 1 });
    let (state, _) = update(state, Msg::PollFailed { generation: 1 });

    let (state, _) = update(state, Msg::StartClicked);
    assert_eq!(state.lifecycle(), Lifecycle::Polling);
    assert!(!state.abort_pending());
    let before = state.clone();

    let (state, effects) = update(state, Msg::AbortCompleted { generation: 1 });
    assert!(effects.is_empty());
    assert_eq!(state, before);
}

#[test]
fn stale_results_after_abort_are_dropped() {
    init_logging();
    let state = polling_with_timer_armed();
    let (state, _) = update(state, Msg::PollTimerFired { generation: 1 });
    let (state, _) = update(state, Msg::AbortClicked);
    let (mut state, _) = update(state, Msg::AbortCompleted { generation: 1 });
    assert!(state.consume_dirty());
    let settled = state.clone();

    // The request that was in flight when the abort landed.
    let (mut state, effects) = update(
        state,
        Msg::SnapshotReceived {
            generation: 1,
            snapshot: ProgressSnapshot::running(4, 8, "copying"),
        },
    );
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
    assert_eq!(state, settled);

    let (state, effects) = update(state, Msg::PollFailed { generation: 1 });
    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::PollTimerFired { generation: 1 });
    assert!(effects.is_empty());
    let (state, _) = update(state, Msg::RunCompleted { generation: 1 });
    assert_eq!(state, settled);
}

#[test]
fn snapshot_without_outstanding_request_is_ignored() {
    init_logging();
    let state = polling_with_timer_armed();
    let before = state.clone();

    let (state, effects) = update(
        state,
        Msg::SnapshotReceived {
            generation: 1,
            snapshot: ProgressSnapshot::running(5, 8, "dup"),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state, before);
}

#[test]
fn run_completion_reveals_progress_once() {
    init_logging();
    let (mut state, _) = update(PollerState::new(), Msg::StartClicked);
    assert!(state.consume_dirty());

    let (mut state, effects) = update(state, Msg::RunCompleted { generation: 1 });
    assert!(effects.is_empty());
    assert!(state.view().progress_visible);
    assert!(state.view().abort_visible);
    assert!(state.consume_dirty());

    let (mut state, _) = update(state, Msg::RunCompleted { generation: 1 });
    assert!(!state.consume_dirty());
}
