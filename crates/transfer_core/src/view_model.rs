use std::fmt;

/// Fixed message shown when a status request fails.
pub const TRANSPORT_ERROR_MESSAGE: &str =
    "An error occurred while checking the transfer progress, contact your administrator";

/// What the status area currently says.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusLine {
    #[default]
    Empty,
    /// Server text shown verbatim (the final `done` status).
    Message(String),
    /// Job started but `current` is still 0; the server is counting work.
    Calculating { total: u64, status: String },
    Progress {
        time_left: String,
        current: u64,
        total: u64,
        status: String,
    },
    TransportError,
}

impl StatusLine {
    /// HTML fragment for the status area. Server-provided text is inserted as-is.
    pub fn to_html(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusLine::Empty => Ok(()),
            StatusLine::Message(text) => f.write_str(text),
            StatusLine::Calculating { total, status } => {
                write!(f, "Calculating total number of tables: {total}<br />{status}")
            }
            StatusLine::Progress {
                time_left,
                current,
                total,
                status,
            } => write!(
                f,
                "{time_left} <span class=\"text-muted\">({current}/{total})</span><br />{status}"
            ),
            StatusLine::TransportError => f.write_str(TRANSPORT_ERROR_MESSAGE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewModel {
    pub progress_visible: bool,
    pub bar_percent: f64,
    pub status: StatusLine,
    pub start_disabled: bool,
    pub abort_visible: bool,
}

impl ViewModel {
    /// Shows the progress area; locks Start and offers Abort.
    pub(crate) fn reveal_progress(&mut self) {
        self.progress_visible = true;
        self.start_disabled = true;
        self.abort_visible = true;
    }

    /// Empties the bar and returns the controls to their idle layout.
    pub(crate) fn hide_progress(&mut self) {
        self.progress_visible = false;
        self.bar_percent = 0.0;
        self.start_disabled = false;
        self.abort_visible = false;
    }
}
