//! # Per-run context handed to an entry point.
//!
//! [`MainContext`] bundles the signals an entry point synchronizes on:
//!
//! ```text
//! MainContext
//!   ├─ ready_fn()     ──► ReadyFn::announce()   (first call releases Execution::ready)
//!   ├─ iter_fn()      ──► IterFn::announce()    (each call counts one iteration)
//!   ├─ quit_signal()  ◄── Execution::quit_signal / OS signal   (cooperative, once)
//!   └─ cancelled()    ◄── Execution::stop / shutdown          (hard stop, token)
//! ```
//!
//! ## Rules
//! - `quit_signal()` is cancel-safe: dropping the future before it resolves does not lose the signal.
//! - After the quit signal was received once, `quit_signal()` resolves immediately.
//! - Announcers are cheap to clone and may be moved into sub-tasks.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::core::Signals;

/// Acknowledgement sent back once the entry point has received the quit signal.
pub(crate) type QuitAck = oneshot::Sender<()>;

/// Readiness announcer.
///
/// Only the first announcement has an effect.
#[derive(Clone, Default)]
pub struct ReadyFn {
    signals: Option<Arc<Signals>>,
}

impl ReadyFn {
    /// Announces that initialization is complete.
    pub fn announce(&self) {
        if let Some(signals) = &self.signals {
            signals.announce_ready();
        }
    }
}

/// Iteration announcer.
#[derive(Clone, Default)]
pub struct IterFn {
    signals: Option<Arc<Signals>>,
}

impl IterFn {
    /// Announces that one unit of work has finished.
    pub fn announce(&self) {
        if let Some(signals) = &self.signals {
            signals.announce_iter();
        }
    }
}

/// Signals for one run of an entry point.
pub struct MainContext {
    token: CancellationToken,
    ready: ReadyFn,
    iter: IterFn,
    quit: Option<mpsc::Receiver<QuitAck>>,
}

impl MainContext {
    /// Context wired to an execution controller.
    pub(crate) fn attached(
        token: CancellationToken,
        signals: Arc<Signals>,
        quit: mpsc::Receiver<QuitAck>,
    ) -> Self {
        Self {
            token,
            ready: ReadyFn {
                signals: Some(Arc::clone(&signals)),
            },
            iter: IterFn {
                signals: Some(signals),
            },
            quit: Some(quit),
        }
    }

    /// Context with no-op announcers, used outside the harness.
    pub(crate) fn detached(token: CancellationToken, quit: mpsc::Receiver<QuitAck>) -> Self {
        Self {
            token,
            ready: ReadyFn::default(),
            iter: IterFn::default(),
            quit: Some(quit),
        }
    }

    /// Returns the readiness announcer.
    pub fn ready_fn(&self) -> ReadyFn {
        self.ready.clone()
    }

    /// Returns the iteration announcer.
    pub fn iter_fn(&self) -> IterFn {
        self.iter.clone()
    }

    /// Waits for the cooperative quit signal.
    ///
    /// Resolves immediately once the signal has been received, or if the sending
    /// side is gone.
    pub async fn quit_signal(&mut self) {
        let Some(rx) = self.quit.as_mut() else {
            return;
        };
        if let Some(ack) = rx.recv().await {
            let _ = ack.send(());
        }
        self.quit = None;
    }

    /// Returns a clone of the cancellation token.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Resolves once the run has been cancelled (hard stop).
    pub fn cancelled(&self) -> impl Future<Output = ()> + '_ {
        self.token.cancelled()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn quit_signal_acknowledges_and_latches() {
        let (tx, rx) = mpsc::channel(1);
        let mut ctx = MainContext::detached(CancellationToken::new(), rx);

        let (ack_tx, ack_rx) = oneshot::channel();
        tx.try_send(ack_tx).expect("send");
        ctx.quit_signal().await;
        assert!(ack_rx.await.is_ok());

        // Second wait returns without another signal.
        ctx.quit_signal().await;
    }

    #[tokio::test]
    async fn quit_signal_survives_cancelled_wait() {
        let (tx, rx) = mpsc::channel(1);
        let mut ctx = MainContext::detached(CancellationToken::new(), rx);

        let timed = tokio::time::timeout(Duration::from_millis(10), ctx.quit_signal()).await;
        assert!(timed.is_err());

        let (ack_tx, ack_rx) = oneshot::channel();
        tx.try_send(ack_tx).expect("send");
        ctx.quit_signal().await;
        assert!(ack_rx.await.is_ok());
    }

    #[tokio::test]
    async fn detached_announcers_are_noops() {
        let (_tx, rx) = mpsc::channel(1);
        let ctx = MainContext::detached(CancellationToken::new(), rx);
        ctx.ready_fn().announce();
        ctx.iter_fn().announce();
        assert!(!ctx.is_cancelled());

        ctx.token().cancel();
        ctx.cancelled().await;
        assert!(ctx.is_cancelled());
    }
}
