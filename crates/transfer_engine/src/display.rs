use transfer_core::DisplayCommand;

/// Receives render commands from the poller (progress bar, status area, buttons).
///
/// Called from the poller task; implementations must not block for long.
pub trait DisplaySink: Send + Sync {
    fn apply(&self, command: DisplayCommand);
}
