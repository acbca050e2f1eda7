use crate::ViewModel;

/// Commands understood by a display sink (progress bar, status area, buttons).
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCommand {
    /// Bar width in percent, already clamped to `0..=100`.
    SetProgressBarWidth(f64),
    SetStatusHtml(String),
    ShowProgress,
    HideProgress,
    SetStartDisabled(bool),
    SetAbortVisible(bool),
}

/// Full command set for a view. Sinks must treat every command as idempotent.
#[allow(clippy::vec_init_then_push)]
pub fn render(view: &ViewModel) -> Vec<DisplayCommand> {
    let mut cmds = Vec::new();

    cmds.push(if view.progress_visible {
        DisplayCommand::ShowProgress
    } else {
        DisplayCommand::HideProgress
    });
    cmds.push(DisplayCommand::SetProgressBarWidth(bar_width(view.bar_percent)));
    cmds.push(DisplayCommand::SetStatusHtml(view.status.to_html()));
    cmds.push(DisplayCommand::SetStartDisabled(view.start_disabled));
    cmds.push(DisplayCommand::SetAbortVisible(view.abort_visible));

    cmds
}

fn bar_width(percent: f64) -> f64 {
    if percent.is_nan() {
        return 0.0;
    }
    percent.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_width_is_clamped() {
        assert_eq!(bar_width(-3.0), 0.0);
        assert_eq!(bar_width(42.5), 42.5);
        assert_eq!(bar_width(250.0), 100.0);
        assert_eq!(bar_width(f64::NAN), 0.0);
    }
}
