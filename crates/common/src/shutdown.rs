//! Cooperative shutdown signalling threaded through long polling loops.
//!
//! A [`ShutdownSignal`] is held by whoever decides when to stop (signal
//! handler, orchestrator); each polling loop holds a [`Shutdown`] and selects
//! on [`Shutdown::wait_for_shutdown`] so an in-progress wait unblocks
//! promptly instead of noticing the signal on its next tick.

use tokio::sync::watch;

/// Sending half of the shutdown signal. Cheap to clone; sending is
/// idempotent.
#[derive(Debug, Clone)]
pub struct ShutdownSignal(watch::Sender<bool>);

impl ShutdownSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self(tx)
    }

    /// Signals shutdown to every subscribed [`Shutdown`].
    pub fn send(&self) {
        // Returns Err only if every receiver is gone, in which case there is
        // nobody left to notify anyway.
        let _ = self.0.send(true);
    }

    pub fn subscribe(&self) -> Shutdown {
        Shutdown(self.0.subscribe())
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving half, held by tasks that should wind down on signal.
#[derive(Debug, Clone)]
pub struct Shutdown(watch::Receiver<bool>);

impl Shutdown {
    /// Check if shutdown has been signalled without blocking.
    pub fn should_shutdown(&self) -> bool {
        *self.0.borrow()
    }

    /// Resolves once shutdown is signalled. Completes immediately if the
    /// signal was already sent.
    pub async fn wait_for_shutdown(&mut self) {
        loop {
            if *self.0.borrow_and_update() {
                return;
            }
            if self.0.changed().await.is_err() {
                // Sender dropped without signalling; no signal can arrive
                // anymore, so park forever rather than pretend we were told
                // to stop.
                std::future::pending::<()>().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn signal_unblocks_waiter() {
        let signal = ShutdownSignal::new();
        let mut shutdown = signal.subscribe();
        assert!(!shutdown.should_shutdown());

        let waiter = tokio::spawn(async move {
            shutdown.wait_for_shutdown().await;
        });

        signal.send();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should unblock")
            .unwrap();
    }

    #[tokio::test]
    async fn already_sent_resolves_immediately() {
        let signal = ShutdownSignal::new();
        signal.send();
        let mut shutdown = signal.subscribe();
        assert!(shutdown.should_shutdown());
        shutdown.wait_for_shutdown().await;
    }
}
