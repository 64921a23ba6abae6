//! # One-way latch.
//!
//! A [`Latch`] starts closed and opens exactly once. Waiters that arrive after it
//! opened return immediately.

use tokio::sync::watch;

/// Open-once gate built on a `watch` channel.
#[derive(Debug)]
pub(crate) struct Latch {
    tx: watch::Sender<bool>,
}

impl Latch {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Opens the latch. Returns `true` only for the call that opened it.
    pub(crate) fn open(&self) -> bool {
        !self.tx.send_replace(true)
    }

    pub(crate) fn is_open(&self) -> bool {
        *self.tx.borrow()
    }

    /// Waits until the latch is open.
    pub(crate) async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender is borrowed by `self`, so the channel cannot close here.
        let _ = rx.wait_for(|open| *open).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn opens_once_and_releases_waiters() {
        let latch = Arc::new(Latch::new());
        assert!(!latch.is_open());

        let waiter = {
            let latch = Arc::clone(&latch);
            tokio::spawn(async move { latch.wait().await })
        };

        assert!(latch.open());
        assert!(!latch.open());
        waiter.await.expect("waiter");

        // Late waiters do not block.
        latch.wait().await;
        assert!(latch.is_open());
    }
}
