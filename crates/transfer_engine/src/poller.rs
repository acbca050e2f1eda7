use std::future::{pending, Future};
use std::pin::Pin;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::stream::FuturesUnordered;
use futures_util::{FutureExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Sleep;
use tokio_util::sync::CancellationToken;
use transfer_core::{
    render, update, Effect, Generation, IntervalPolicy, Lifecycle, Msg, PollerState,
    ProgressSnapshot,
};
use transfer_logging::{transfer_debug, transfer_error, transfer_info, transfer_trace, transfer_warn};

use crate::{DisplaySink, JobControl, StatusSource, TransportError};

type StatusFuture = BoxFuture<'static, (Generation, Result<ProgressSnapshot, TransportError>)>;
type ControlFuture = BoxFuture<'static, (Generation, Result<(), TransportError>)>;

#[derive(Debug, Clone, Copy)]
enum PollerCommand {
    Start,
    Attach,
    Abort,
}

/// Controller-side handle to a running poller task.
pub struct PollerHandle {
    cmd_tx: mpsc::UnboundedSender<PollerCommand>,
    lifecycle_rx: watch::Receiver<Lifecycle>,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Launch the job and poll immediately.
    pub fn start(&self) {
        let _ = self.cmd_tx.send(PollerCommand::Start);
    }

    /// Follow a job that may already be running, without launching it.
    pub fn attach(&self) {
        let _ = self.cmd_tx.send(PollerCommand::Attach);
    }

    /// Request cancellation; ignored unless polling.
    pub fn abort(&self) {
        let _ = self.cmd_tx.send(PollerCommand::Abort);
    }

    /// Coarse lifecycle updates. A cancellation request that is still
    /// outstanding reports `Aborting`, even if a failure or `done` ended polling.
    pub fn lifecycle(&self) -> watch::Receiver<Lifecycle> {
        self.lifecycle_rx.clone()
    }

    /// Stops the task, dropping any outstanding request or timer.
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        if let Err(err) = self.task.await {
            transfer_error!("Poller task ended abnormally: {}", err);
        }
    }
}

enum Event {
    Command(PollerCommand),
    Status(Generation, Result<ProgressSnapshot, TransportError>),
    TimerFired(Generation),
    RunDone(Generation, Result<(), TransportError>),
    AbortDone(Generation, Result<(), TransportError>),
    Closed,
}

/// Drives `transfer_core::update` on one tokio task and executes its effects.
///
/// Single-flight: at most one status request exists at a time, and the next
/// timer is only armed once that request has resolved.
pub struct ProgressPoller {
    source: Arc<dyn StatusSource>,
    control: Arc<dyn JobControl>,
    sink: Arc<dyn DisplaySink>,
    state: PollerState,
    lifecycle_tx: watch::Sender<Lifecycle>,
    in_flight: Option<StatusFuture>,
    timer: Option<(Generation, Pin<Box<Sleep>>)>,
    abort_request: Option<ControlFuture>,
    runs: FuturesUnordered<ControlFuture>,
}

impl ProgressPoller {
    /// Spawns the poller on the current tokio runtime. It stays idle until
    /// `start` or `attach` is called on the handle.
    pub fn spawn(
        source: Arc<dyn StatusSource>,
        control: Arc<dyn JobControl>,
        sink: Arc<dyn DisplaySink>,
        policy: IntervalPolicy,
    ) -> PollerHandle {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (lifecycle_tx, lifecycle_rx) = watch::channel(Lifecycle::Idle);
        let shutdown = CancellationToken::new();

        let poller = Self {
            source,
            control,
            sink,
            state: PollerState::with_policy(policy),
            lifecycle_tx,
            in_flight: None,
            timer: None,
            abort_request: None,
            runs: FuturesUnordered::new(),
        };
        let task = tokio::spawn(poller.run(cmd_rx, shutdown.clone()));

        PollerHandle {
            cmd_tx,
            lifecycle_rx,
            shutdown,
            task,
        }
    }

    async fn run(
        mut self,
        mut cmd_rx: mpsc::UnboundedReceiver<PollerCommand>,
        shutdown: CancellationToken,
    ) {
        loop {
            let event = tokio::select! {
                _ = shutdown.cancelled() => Event::Closed,
                command = cmd_rx.recv() => command.map_or(Event::Closed, Event::Command),
                (generation, result) = next_from(&mut self.in_flight) => Event::Status(generation, result),
                generation = timer_fired(&mut self.timer) => Event::TimerFired(generation),
                (generation, result) = next_from(&mut self.abort_request) => Event::AbortDone(generation, result),
                Some((generation, result)) = self.runs.next(), if !self.runs.is_empty() => Event::RunDone(generation, result),
            };

            let msg = match event {
                Event::Closed => break,
                Event::Command(command) => command_msg(command),
                Event::Status(generation, result) => {
                    self.in_flight = None;
                    status_msg(generation, result)
                }
                Event::TimerFired(generation) => {
                    self.timer = None;
                    Msg::PollTimerFired { generation }
                }
                Event::RunDone(generation, result) => {
                    if let Err(err) = result {
                        transfer_warn!("Run request failed, polling continues: {}", err);
                    }
                    Msg::RunCompleted { generation }
                }
                Event::AbortDone(generation, result) => {
                    self.abort_request = None;
                    match result {
                        Ok(()) => transfer_info!("Abort request acknowledged"),
                        Err(err) => transfer_warn!("Abort request failed, resetting anyway: {}", err),
                    }
                    Msg::AbortCompleted { generation }
                }
            };

            self.dispatch(msg);
        }
        transfer_debug!("Poller task stopped");
    }

    fn dispatch(&mut self, msg: Msg) {
        let before = self.state.phase();
        let msg_label = format!("{msg:?}");
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;

        let after = self.state.phase();
        if before != after {
            transfer_debug!("{} moved poller {:?} -> {:?}", msg_label, before, after);
        } else if effects.is_empty() {
            transfer_trace!("{} ignored in {:?}", msg_label, after);
        }

        for effect in effects {
            self.execute(effect);
        }

        if self.state.consume_dirty() {
            for command in render(&self.state.view()) {
                self.sink.apply(command);
            }
        }

        let lifecycle = self.state.lifecycle();
        self.lifecycle_tx.send_if_modified(|current| {
            if *current == lifecycle {
                return false;
            }
            *current = lifecycle;
            true
        });
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::RunJob { generation } => {
                transfer_info!("Launching transfer job");
                let control = Arc::clone(&self.control);
                self.runs
                    .push(async move { (generation, control.run().await) }.boxed());
            }
            Effect::RequestStatus { generation } => {
                if self.in_flight.is_some() {
                    transfer_warn!("Replacing an outstanding status request");
                }
                let source = Arc::clone(&self.source);
                self.in_flight =
                    Some(async move { (generation, source.fetch_status().await) }.boxed());
            }
            Effect::SchedulePoll { generation, delay } => {
                if self.state.last_current().is_some() && delay > self.state.policy().base {
                    transfer_trace!(
                        "Progress stalled at {:?}; next poll in {:?}",
                        self.state.last_current(),
                        delay
                    );
                }
                self.timer = Some((generation, Box::pin(tokio::time::sleep(delay))));
            }
            Effect::CancelScheduledPoll => {
                self.timer = None;
                self.in_flight = None;
            }
            Effect::RequestAbort { generation } => {
                transfer_info!("Requesting transfer abort");
                let control = Arc::clone(&self.control);
                self.abort_request =
                    Some(async move { (generation, control.abort_queue().await) }.boxed());
            }
        }
    }
}

fn command_msg(command: PollerCommand) -> Msg {
    match command {
        PollerCommand::Start => Msg::StartClicked,
        PollerCommand::Attach => Msg::Attach,
        PollerCommand::Abort => Msg::AbortClicked,
    }
}

fn status_msg(generation: Generation, result: Result<ProgressSnapshot, TransportError>) -> Msg {
    match result {
        Ok(snapshot) => {
            if snapshot.done {
                transfer_info!("Transfer reported done: {}", snapshot.status);
            }
            Msg::SnapshotReceived {
                generation,
                snapshot,
            }
        }
        Err(err) => {
            transfer_error!("Status request failed: {}", err);
            Msg::PollFailed { generation }
        }
    }
}

/// Resolves with the slot's output, or never when the slot is empty.
/// The slot keeps ownership, so losing a `select!` race does not drop the work.
async fn next_from<F: Future + Unpin>(slot: &mut Option<F>) -> F::Output {
    match slot {
        Some(fut) => fut.await,
        None => pending().await,
    }
}

async fn timer_fired(slot: &mut Option<(Generation, Pin<Box<Sleep>>)>) -> Generation {
    match slot {
        Some((generation, sleep)) => {
            sleep.as_mut().await;
            *generation
        }
        None => pending().await,
    }
}
