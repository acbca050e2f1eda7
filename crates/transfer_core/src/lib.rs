//! Transfer core: pure polling state machine and view-model helpers.
mod effect;
mod interval;
mod msg;
mod progress;
mod render;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use interval::IntervalPolicy;
pub use msg::Msg;
pub use progress::{percentage, ProgressSnapshot};
pub use render::{render, DisplayCommand};
pub use state::{Cycle, Generation, Lifecycle, Outcome, Phase, PollerState};
pub use update::update;
pub use view_model::{StatusLine, ViewModel, TRANSPORT_ERROR_MESSAGE};
