use tokio::sync::watch;

/// `true` once the measurement should stop.
pub type ShutdownSender = watch::Sender<bool>;
pub type ShutdownReceiver = watch::Receiver<bool>;

#[must_use]
pub fn shutdown_channel() -> (ShutdownSender, ShutdownReceiver) {
    watch::channel(false)
}

/// Resolves once shutdown is requested. Never resolves if every sender is
/// dropped without requesting it.
pub async fn wait_for_shutdown(shutdown_rx: &mut ShutdownReceiver) {
    let requested = shutdown_rx.wait_for(|stop| *stop).await.map(|_| ());
    if requested.is_err() {
        std::future::pending::<()>().await;
    }
}

#[must_use]
pub fn is_shutdown(shutdown_rx: &ShutdownReceiver) -> bool {
    *shutdown_rx.borrow()
}
