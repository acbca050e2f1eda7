//! Logger setup for the `transfer` binary.
//!
//! The progress bar owns the terminal, so logs go to a file unless asked otherwise.

use log::LevelFilter;
use transfer_logging::LogDestination;

use crate::cli::{Cli, LogTarget};

pub fn initialize(cli: &Cli) {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    transfer_logging::initialize(destination(cli.log), level, &cli.log_file);
}

fn destination(target: LogTarget) -> LogDestination {
    match target {
        LogTarget::File => LogDestination::File,
        LogTarget::Terminal => LogDestination::Terminal,
        LogTarget::Both => LogDestination::Both,
    }
}
