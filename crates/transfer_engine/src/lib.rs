//! Transfer engine: status/job-control transport and the poller runtime.
mod client;
mod display;
mod endpoint;
mod poller;
mod types;
mod wire;

pub use client::{ClientSettings, JobControl, ReqwestTransferClient, StatusSource};
pub use display::DisplaySink;
pub use endpoint::{
    ajax_url, Endpoints, ABORT_METHOD, DEFAULT_ACTION, RUN_METHOD, STATUS_METHOD,
};
pub use poller::{PollerHandle, ProgressPoller};
pub use types::{FailureKind, TransportError};
pub use wire::decode_snapshot;
