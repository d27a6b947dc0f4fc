use std::time::Duration;

use tracing::warn;

use crate::shutdown::{ShutdownSender, wait_for_shutdown};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Trips shutdown on Ctrl+C (and SIGTERM on unix).
#[must_use]
pub fn setup_signal_shutdown_handler(shutdown_tx: &ShutdownSender) -> tokio::task::JoinHandle<()> {
    let shutdown_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        let mut shutdown_rx = shutdown_tx.subscribe();

        #[cfg(unix)]
        let mut term_signal = match signal(SignalKind::terminate()) {
            Ok(signal) => Some(signal),
            Err(err) => {
                warn!("Failed to register SIGTERM handler: {}", err);
                None
            }
        };

        #[cfg(unix)]
        {
            tokio::select! {
                () = wait_for_shutdown(&mut shutdown_rx) => {}
                _ = tokio::signal::ctrl_c() => {
                    warn!("Interrupted, cancelling in-flight transfers.");
                    drop(shutdown_tx.send(true));
                }
                () = async {
                    if let Some(signal) = term_signal.as_mut() {
                        signal.recv().await;
                    } else {
                        std::future::pending::<()>().await;
                    }
                } => {
                    warn!("Terminated, cancelling in-flight transfers.");
                    drop(shutdown_tx.send(true));
                }
            }
        }

        #[cfg(not(unix))]
        {
            tokio::select! {
                () = wait_for_shutdown(&mut shutdown_rx) => {}
                _ = tokio::signal::ctrl_c() => {
                    warn!("Interrupted, cancelling in-flight transfers.");
                    drop(shutdown_tx.send(true));
                }
            }
        }
    })
}

/// Trips shutdown once `deadline` has elapsed.
#[must_use]
pub fn setup_deadline_shutdown_handler(
    shutdown_tx: &ShutdownSender,
    deadline: Duration,
) -> tokio::task::JoinHandle<()> {
    let shutdown_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        let mut shutdown_rx = shutdown_tx.subscribe();
        tokio::select! {
            () = wait_for_shutdown(&mut shutdown_rx) => {}
            () = tokio::time::sleep(deadline) => {
                warn!("Deadline of {:?} reached, cancelling in-flight transfers.", deadline);
                drop(shutdown_tx.send(true));
            }
        }
    })
}
