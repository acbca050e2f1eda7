use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;
use transfer_core::Lifecycle;
use transfer_engine::{Endpoints, PollerHandle, ProgressPoller, ReqwestTransferClient};
use transfer_logging::{transfer_info, transfer_warn};

use super::config::load_config;
use super::ui::terminal::TerminalDisplay;
use crate::cli::{Cli, Command};

/// How the controller stopped following the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Finish {
    Done,
    Failed,
    Aborted,
    Interrupted,
}

impl Finish {
    fn exit_code(self) -> ExitCode {
        match self {
            Finish::Done | Finish::Aborted => ExitCode::SUCCESS,
            Finish::Failed | Finish::Interrupted => ExitCode::FAILURE,
        }
    }
}

pub async fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = load_config(&cli.config)?;
    if let Some(webroot) = cli.webroot.clone() {
        config.webroot = webroot;
    }

    let endpoints = Endpoints::new(&config.webroot, &config.action)
        .with_context(|| format!("invalid webroot {:?}", config.webroot))?;
    let client = Arc::new(
        ReqwestTransferClient::new(endpoints, &config.client.settings())
            .context("failed to build HTTP client")?,
    );
    let display = Arc::new(TerminalDisplay::new());

    let handle = ProgressPoller::spawn(
        client.clone(),
        client,
        display.clone(),
        config.poll.policy(),
    );
    match cli.command {
        Command::Run => {
            transfer_info!("Starting transfer at {}", config.webroot);
            handle.start();
        }
        Command::Watch => {
            transfer_info!("Following transfer at {}", config.webroot);
            handle.attach();
        }
    }

    let mut interrupts = listen_for_interrupts();
    let finish = supervise(&handle, &mut interrupts).await;
    display.finish();
    handle.shutdown().await;

    transfer_info!("Controller finished: {:?}", finish);
    Ok(finish.exit_code())
}

/// Forwards every Ctrl-C as one unit message. The channel closes when the
/// signal handler cannot be installed.
fn listen_for_interrupts() -> mpsc::UnboundedReceiver<()> {
    let (interrupt_tx, interrupts) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        loop {
            if let Err(err) = tokio::signal::ctrl_c().await {
                transfer_warn!("Cannot listen for Ctrl-C: {}", err);
                break;
            }
            if interrupt_tx.send(()).is_err() {
                break;
            }
        }
    });
    interrupts
}

/// Follows the poller until it settles. The first interrupt requests an abort
/// and waits for the backend to acknowledge it, a second one stops following
/// without waiting.
async fn supervise(
    handle: &PollerHandle,
    interrupts: &mut mpsc::UnboundedReceiver<()>,
) -> Finish {
    let mut lifecycle = handle.lifecycle();
    // Any published change means the start or attach command was processed,
    // even when the watch merged Polling and Aborting into a final Idle.
    let mut started = lifecycle.has_changed().unwrap_or(false);
    let mut abort_requested = false;
    let mut listening = true;

    loop {
        let now = *lifecycle.borrow_and_update();
        match now {
            Lifecycle::Polling | Lifecycle::Aborting => started = true,
            Lifecycle::Done => return Finish::Done,
            Lifecycle::Failed => return Finish::Failed,
            Lifecycle::Idle if started => return Finish::Aborted,
            Lifecycle::Idle => {}
        }

        tokio::select! {
            changed = lifecycle.changed() => {
                if changed.is_err() {
                    return Finish::Interrupted;
                }
                started = true;
            }
            interrupt = interrupts.recv(), if listening => {
                if interrupt.is_none() {
                    listening = false;
                    continue;
                }
                if abort_requested {
                    return Finish::Interrupted;
                }
                abort_requested = true;
                transfer_info!("Abort requested by operator");
                handle.abort();
            }
        }
    }
}
