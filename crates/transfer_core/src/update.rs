use crate::{Cycle, Effect, Msg, Phase, PollerState};

/// Pure update function: applies a message to state and returns any effects.
///
/// Messages that are illegal in the current phase, or that carry a stale
/// generation, leave the state untouched and produce no effects.
pub fn update(mut state: PollerState, msg: Msg) -> (PollerState, Vec<Effect>) {
    let effects = match msg {
        Msg::StartClicked => {
            if !state.can_start() {
                return (state, Vec::new());
            }
            let generation = state.begin_polling();
            state.lock_start();
            vec![
                Effect::RunJob { generation },
                Effect::RequestStatus { generation },
            ]
        }
        Msg::Attach => {
            if state.phase() != Phase::Idle {
                return (state, Vec::new());
            }
            let generation = state.begin_polling();
            vec![Effect::RequestStatus { generation }]
        }
        Msg::SnapshotReceived {
            generation,
            snapshot,
        } => {
            if !state.awaiting(generation, Cycle::InFlight) {
                return (state, Vec::new());
            }
            match state.apply_snapshot(snapshot) {
                Some(delay) => vec![Effect::SchedulePoll { generation, delay }],
                None => Vec::new(),
            }
        }
        Msg::PollFailed { generation } => {
            if !state.awaiting(generation, Cycle::InFlight) {
                return (state, Vec::new());
            }
            state.apply_failure();
            Vec::new()
        }
        Msg::PollTimerFired { generation } => {
            if !state.awaiting(generation, Cycle::Scheduled) {
                return (state, Vec::new());
            }
            state.arm_request();
            vec![Effect::RequestStatus { generation }]
        }
        Msg::RunCompleted { generation } => {
            if state.is_current(generation) {
                state.reveal_progress();
            }
            Vec::new()
        }
        Msg::AbortClicked => {
            if !matches!(state.phase(), Phase::Polling(_)) {
                return (state, Vec::new());
            }
            state.begin_abort();
            vec![Effect::RequestAbort {
                generation: state.generation(),
            }]
        }
        Msg::AbortCompleted { generation } => {
            if !state.awaiting_abort(generation) {
                return (state, Vec::new());
            }
            state.finish_abort();
            vec![Effect::CancelScheduledPoll]
        }
    };

    (state, effects)
}
