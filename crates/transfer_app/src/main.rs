mod cli;
mod platform;

use std::process::ExitCode;

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = cli::Cli::parse();
    platform::logging::initialize(&cli);
    platform::run_app(cli).await
}
