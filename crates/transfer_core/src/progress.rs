/// One server-reported progress reading.
///
/// Fields the server left out are already defaulted: numbers to `0`, text to `""`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressSnapshot {
    pub done: bool,
    pub status: String,
    pub total: u64,
    pub current: u64,
    pub time_left: String,
}

impl ProgressSnapshot {
    pub fn finished(status: impl Into<String>) -> Self {
        Self {
            done: true,
            status: status.into(),
            ..Self::default()
        }
    }

    pub fn running(current: u64, total: u64, status: impl Into<String>) -> Self {
        Self {
            done: false,
            status: status.into(),
            total,
            current,
            time_left: String::new(),
        }
    }

    pub fn with_time_left(mut self, time_left: impl Into<String>) -> Self {
        self.time_left = time_left.into();
        self
    }

    pub fn percentage(&self) -> f64 {
        percentage(self.current, self.total)
    }
}

/// Completion percentage rounded half-up to two decimals.
///
/// A zero `total` yields `0.0` rather than dividing by zero. The result is not
/// clamped: a server reporting `current > total` gets a value above 100.
pub fn percentage(current: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = current as f64 / total as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}
