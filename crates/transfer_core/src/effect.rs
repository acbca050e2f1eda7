use std::time::Duration;

use crate::Generation;

/// Side effects requested by `update`. The runtime executes them and feeds the
/// results back as `Msg`s tagged with the same generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the backend to start or resume the job. Fire-and-forget.
    RunJob { generation: Generation },
    /// Issue one status request now.
    RequestStatus { generation: Generation },
    /// Arm the next-poll timer.
    SchedulePoll {
        generation: Generation,
        delay: Duration,
    },
    /// Drop any armed timer and any in-flight status request.
    CancelScheduledPoll,
    /// Ask the backend to cancel the job.
    RequestAbort { generation: Generation },
}
