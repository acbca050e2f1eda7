use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "transfer",
    about = "Launch or follow a server-side transfer job and show its progress"
)]
pub struct Cli {
    /// RON config file; defaults apply when it does not exist.
    #[arg(long, default_value = "transfer.ron")]
    pub config: PathBuf,

    /// Overrides `webroot` from the config file.
    #[arg(long)]
    pub webroot: Option<String>,

    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,

    #[arg(long, default_value = "transfer.log")]
    pub log_file: PathBuf,

    /// Log at debug level instead of info.
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Start the job, then follow its progress. Ctrl-C aborts it.
    Run,
    /// Follow a job that is already running without starting it.
    Watch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}
