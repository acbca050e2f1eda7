use std::time::Duration;

use crate::view_model::{StatusLine, ViewModel};
use crate::{percentage, IntervalPolicy, ProgressSnapshot};

/// Identifies one polling session. Results tagged with an older generation are stale.
pub type Generation = u64;

/// Where the current poll cycle stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    /// A status request is outstanding.
    InFlight,
    /// The next-poll timer is armed.
    Scheduled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Polling(Cycle),
    /// Still polling, with a cancellation request outstanding.
    Aborting(Cycle),
    Terminal(Outcome),
}

/// Coarse phase without cycle detail, for observers outside the poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Idle,
    Polling,
    Aborting,
    Done,
    Failed,
}

impl Phase {
    pub fn lifecycle(self) -> Lifecycle {
        match self {
            Phase::Idle => Lifecycle::Idle,
            Phase::Polling(_) => Lifecycle::Polling,
            Phase::Aborting(_) => Lifecycle::Aborting,
            Phase::Terminal(Outcome::Done) => Lifecycle::Done,
            Phase::Terminal(Outcome::Failed) => Lifecycle::Failed,
        }
    }

    fn cycle(self) -> Option<Cycle> {
        match self {
            Phase::Polling(cycle) | Phase::Aborting(cycle) => Some(cycle),
            Phase::Idle | Phase::Terminal(_) => None,
        }
    }

    fn with_cycle(self, cycle: Cycle) -> Phase {
        match self {
            Phase::Aborting(_) => Phase::Aborting(cycle),
            _ => Phase::Polling(cycle),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PollerState {
    policy: IntervalPolicy,
    phase: Phase,
    generation: Generation,
    interval: Duration,
    last_current: Option<u64>,
    cycles: u64,
    /// A cancellation request for the current generation has not returned yet.
    abort_pending: bool,
    view: ViewModel,
    dirty: bool,
}

impl Default for PollerState {
    fn default() -> Self {
        Self::with_policy(IntervalPolicy::default())
    }
}

impl PollerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: IntervalPolicy) -> Self {
        Self {
            policy,
            phase: Phase::Idle,
            generation: 0,
            interval: policy.base,
            last_current: None,
            cycles: 0,
            abort_pending: false,
            view: ViewModel::default(),
            dirty: false,
        }
    }

    pub fn view(&self) -> ViewModel {
        self.view.clone()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// An outstanding cancellation request reports `Aborting` even after the
    /// session reached a terminal outcome, until that request returns.
    pub fn lifecycle(&self) -> Lifecycle {
        match self.phase {
            Phase::Terminal(_) if self.abort_pending => Lifecycle::Aborting,
            phase => phase.lifecycle(),
        }
    }

    pub fn abort_pending(&self) -> bool {
        self.abort_pending
    }

    pub fn is_running(&self) -> bool {
        self.phase.cycle().is_some()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Delay used for the most recently scheduled poll.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn last_current(&self) -> Option<u64> {
        self.last_current
    }

    /// Snapshots processed since the last start.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn policy(&self) -> IntervalPolicy {
        self.policy
    }

    /// Returns whether the view changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn can_start(&self) -> bool {
        matches!(self.phase, Phase::Idle | Phase::Terminal(_))
    }

    pub(crate) fn is_current(&self, generation: Generation) -> bool {
        self.generation == generation && self.is_running()
    }

    pub(crate) fn awaiting(&self, generation: Generation, cycle: Cycle) -> bool {
        self.generation == generation && self.phase.cycle() == Some(cycle)
    }

    /// Opens a fresh polling session with its first request in flight.
    pub(crate) fn begin_polling(&mut self) -> Generation {
        self.generation += 1;
        self.phase = Phase::Polling(Cycle::InFlight);
        self.interval = self.policy.base;
        self.last_current = None;
        self.cycles = 0;
        self.abort_pending = false;
        self.generation
    }

    pub(crate) fn lock_start(&mut self) {
        if !self.view.start_disabled {
            self.view.start_disabled = true;
            self.dirty = true;
        }
    }

    /// Applies a snapshot and returns the delay before the next poll, if any.
    pub(crate) fn apply_snapshot(&mut self, snapshot: ProgressSnapshot) -> Option<Duration> {
        self.dirty = true;
        if snapshot.done {
            self.phase = Phase::Terminal(Outcome::Done);
            self.view.status = StatusLine::Message(snapshot.status);
            self.view.hide_progress();
            self.reset_cadence();
            return None;
        }

        self.view.reveal_progress();
        if snapshot.current == 0 {
            self.view.status = StatusLine::Calculating {
                total: snapshot.total,
                status: snapshot.status,
            };
        } else {
            self.view.bar_percent = percentage(snapshot.current, snapshot.total);
            self.view.status = StatusLine::Progress {
                time_left: snapshot.time_left,
                current: snapshot.current,
                total: snapshot.total,
                status: snapshot.status,
            };
        }

        self.interval = self
            .policy
            .next(self.interval, self.last_current, snapshot.current);
        self.last_current = Some(snapshot.current);
        self.cycles += 1;
        self.phase = self.phase.with_cycle(Cycle::Scheduled);
        Some(self.interval)
    }

    /// Transport failure: only the message and the controls change, the bar stays frozen.
    pub(crate) fn apply_failure(&mut self) {
        self.phase = Phase::Terminal(Outcome::Failed);
        self.view.status = StatusLine::TransportError;
        self.view.start_disabled = false;
        self.view.abort_visible = false;
        self.reset_cadence();
        self.dirty = true;
    }

    pub(crate) fn arm_request(&mut self) {
        self.phase = self.phase.with_cycle(Cycle::InFlight);
    }

    pub(crate) fn begin_abort(&mut self) {
        if let Phase::Polling(cycle) = self.phase {
            self.phase = Phase::Aborting(cycle);
            self.abort_pending = true;
        }
    }

    pub(crate) fn awaiting_abort(&self, generation: Generation) -> bool {
        self.abort_pending && self.generation == generation
    }

    /// Local reset after the cancellation request returned. Bumps the generation
    /// so anything still in flight is ignored when it lands. Also applies when a
    /// failure or `done` ended the session while the request was outstanding.
    pub(crate) fn finish_abort(&mut self) {
        self.generation += 1;
        self.abort_pending = false;
        self.phase = Phase::Idle;
        self.view.status = StatusLine::Empty;
        self.view.hide_progress();
        self.reset_cadence();
        self.dirty = true;
    }

    pub(crate) fn reveal_progress(&mut self) {
        let before = self.view.clone();
        self.view.reveal_progress();
        if self.view != before {
            self.dirty = true;
        }
    }

    fn reset_cadence(&mut self) {
        self.interval = self.policy.base;
        self.last_current = None;
    }
}
