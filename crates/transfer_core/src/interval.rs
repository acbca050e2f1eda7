use std::time::Duration;

/// Stall-adaptive polling cadence.
///
/// While `current` stays unchanged between consecutive snapshots the interval
/// grows by `increment`, never beyond `max` (when set). Any movement resets it
/// to `base`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalPolicy {
    pub base: Duration,
    pub increment: Duration,
    pub max: Option<Duration>,
}

impl Default for IntervalPolicy {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(150),
            increment: Duration::from_millis(75),
            max: Some(Duration::from_secs(10)),
        }
    }
}

impl IntervalPolicy {
    /// Interval to wait before the next poll, given the interval used so far,
    /// the `current` seen on the previous cycle and the one just observed.
    pub fn next(&self, interval: Duration, last_current: Option<u64>, observed: u64) -> Duration {
        if last_current != Some(observed) {
            return self.base;
        }
        let grown = interval.saturating_add(self.increment);
        match self.max {
            // A cap below base would make the interval shrink on a stall.
            Some(max) => grown.min(max.max(self.base)),
            None => grown,
        }
    }
}
