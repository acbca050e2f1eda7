use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use transfer_core::DisplayCommand;
use transfer_engine::DisplaySink;
use transfer_logging::{transfer_debug, transfer_warn};

use super::status_text::status_plain_text;

/// Bar resolution: hundredths of a percent.
const BAR_SCALE: f64 = 100.0;
const BAR_LENGTH: u64 = 100 * 100;
const ABORT_HINT: &str = "ctrl-c aborts";

#[derive(Debug, Default)]
struct TerminalState {
    visible: bool,
    percent: f64,
    status: String,
    last_printed: String,
}

/// Display sink drawing an indicatif bar on stderr.
///
/// While the progress area is hidden, status text is printed as plain lines instead.
pub struct TerminalDisplay {
    bar: ProgressBar,
    state: Mutex<TerminalState>,
}

impl TerminalDisplay {
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(Some(BAR_LENGTH), ProgressDrawTarget::hidden());
        match ProgressStyle::with_template("{prefix:>13} [{bar:40.cyan/blue}] {msg}") {
            Ok(style) => bar.set_style(style.progress_chars("=> ")),
            Err(err) => transfer_warn!("Falling back to default bar style: {}", err),
        }
        Self {
            bar,
            state: Mutex::new(TerminalState::default()),
        }
    }

    /// Leaves the last drawn state on screen.
    pub fn finish(&self) {
        self.bar.abandon();
    }

    fn redraw(&self, state: &TerminalState) {
        let first_line = state.status.lines().next().unwrap_or_default();
        let rest: Vec<&str> = state.status.lines().skip(1).collect();
        let message = if rest.is_empty() {
            format!("{:>6.2}% {}", state.percent, first_line)
        } else {
            format!("{:>6.2}% {} | {}", state.percent, first_line, rest.join(" | "))
        };
        self.bar.set_message(message);
    }

    fn print_status(&self, state: &mut TerminalState) {
        if state.status.is_empty() || state.status == state.last_printed {
            return;
        }
        state.last_printed = state.status.clone();
        let text = state.status.clone();
        self.bar.suspend(|| eprintln!("{text}"));
    }
}

impl DisplaySink for TerminalDisplay {
    fn apply(&self, command: DisplayCommand) {
        let Ok(mut state) = self.state.lock() else {
            transfer_warn!("Terminal display state poisoned; dropping {:?}", command);
            return;
        };
        match command {
            DisplayCommand::ShowProgress => {
                if !state.visible {
                    state.visible = true;
                    self.bar.set_draw_target(ProgressDrawTarget::stderr());
                    self.bar.enable_steady_tick(Duration::from_millis(250));
                }
            }
            DisplayCommand::HideProgress => {
                if state.visible {
                    state.visible = false;
                    self.bar.disable_steady_tick();
                    self.bar.finish_and_clear();
                    self.bar.reset();
                    self.bar.set_draw_target(ProgressDrawTarget::hidden());
                }
            }
            DisplayCommand::SetProgressBarWidth(percent) => {
                state.percent = percent;
                self.bar.set_position((percent * BAR_SCALE).round() as u64);
                self.redraw(&state);
            }
            DisplayCommand::SetStatusHtml(html) => {
                state.status = status_plain_text(&html);
                if state.visible {
                    self.redraw(&state);
                } else {
                    self.print_status(&mut state);
                }
            }
            DisplayCommand::SetStartDisabled(disabled) => {
                transfer_debug!("Start control {}", if disabled { "locked" } else { "free" });
            }
            DisplayCommand::SetAbortVisible(visible) => {
                self.bar.set_prefix(if visible { ABORT_HINT } else { "" });
            }
        }
    }
}
