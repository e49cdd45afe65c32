//! OS signal listener
//!
//! SIGINT and SIGTERM both request a graceful shutdown. The loop finishes
//! whatever it is doing (invocation or sleep) and exits at its next check.

use log::{info, warn};
use tokio::task::JoinHandle;

use crate::daemon::shutdown::ShutdownFlag;
use crate::error::{Result, WorkerError};

/// Register signal handlers and spawn a task that sets `flag` on delivery
///
/// Handlers are registered before this returns, so a signal raised right
/// after the call is not lost.
#[cfg(unix)]
pub fn listen(flag: ShutdownFlag) -> Result<JoinHandle<()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint =
        signal(SignalKind::interrupt()).map_err(|e| WorkerError::Signal(format!("SIGINT: {}", e)))?;
    let mut sigterm =
        signal(SignalKind::terminate()).map_err(|e| WorkerError::Signal(format!("SIGTERM: {}", e)))?;

    Ok(tokio::spawn(async move {
        loop {
            let name = tokio::select! {
                received = sigint.recv() => match received {
                    Some(()) => "SIGINT",
                    None => break,
                },
                received = sigterm.recv() => match received {
                    Some(()) => "SIGTERM",
                    None => break,
                },
            };
            on_signal(&flag, name);
        }
    }))
}

#[cfg(not(unix))]
pub fn listen(flag: ShutdownFlag) -> Result<JoinHandle<()>> {
    Ok(tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Ctrl-C handler failed: {}", e);
                break;
            }
            on_signal(&flag, "Ctrl-C");
        }
    }))
}

fn on_signal(flag: &ShutdownFlag, name: &str) {
    if flag.request() {
        info!("Received {}, shutting down...", name);
    } else {
        warn!("Received {} again, shutdown already in progress", name);
    }
}
