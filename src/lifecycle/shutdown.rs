//! Stop signal shared by the listener and the health monitor.

use tokio::sync::broadcast;

/// One-shot stop signal.
///
/// The HTTP listener and the health monitor each hold a receiver; Ctrl+C or a
/// test harness calls [`Shutdown::trigger`].
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver for a task that must stop when the balancer does.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Fire the signal. Returns how many tasks were listening.
    pub fn trigger(&self) -> usize {
        let notified = self.tx.send(()).unwrap_or(0);
        tracing::debug!(tasks = notified, "Stop signal sent");
        notified
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve once `rx` sees the stop signal, or once its [`Shutdown`] is gone.
pub async fn stopped(mut rx: broadcast::Receiver<()>) {
    let _ = rx.recv().await;
}
