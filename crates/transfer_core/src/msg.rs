#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Operator launched the job.
    StartClicked,
    /// Page load: follow a job that may already be running, without launching it.
    Attach,
    /// Status source answered.
    SnapshotReceived {
        generation: crate::Generation,
        snapshot: crate::ProgressSnapshot,
    },
    /// Status request failed (network, timeout, non-2xx or undecodable body).
    PollFailed { generation: crate::Generation },
    /// The next-poll timer elapsed.
    PollTimerFired { generation: crate::Generation },
    /// The job-control `run` request finished, successfully or not.
    RunCompleted { generation: crate::Generation },
    /// Operator clicked Abort.
    AbortClicked,
    /// The job-control `abortQueue` request finished, successfully or not.
    AbortCompleted { generation: crate::Generation },
}
