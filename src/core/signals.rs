//! # Signals shared between an execution and its entry point.
//!
//! [`Signals`] is the entry-point-facing half of an execution: the announcers in
//! [`MainContext`](crate::MainContext) write to it, the controller reads from it.

use tokio::sync::watch;

use super::latch::Latch;
use super::state::{ExecutionState, StateCell};
use crate::events::{Bus, Event, EventKind};

pub(crate) struct Signals {
    pub(crate) ready: Latch,
    pub(crate) iters: watch::Sender<u64>,
    pub(crate) state: StateCell,
    pub(crate) bus: Bus,
}

impl Signals {
    pub(crate) fn new(bus: Bus) -> Self {
        let (iters, _rx) = watch::channel(0);
        Self {
            ready: Latch::new(),
            iters,
            state: StateCell::new(),
            bus,
        }
    }

    pub(crate) fn announce_ready(&self) {
        if self.ready.open() {
            self.state.advance(ExecutionState::Ready);
            self.bus.publish(Event::new(EventKind::ReadyAnnounced));
            tracing::debug!("main function announced ready");
        }
    }

    pub(crate) fn announce_iter(&self) {
        let mut count = 0;
        self.iters.send_modify(|n| {
            *n += 1;
            count = *n;
        });
        self.bus
            .publish(Event::new(EventKind::IterationAnnounced).with_iteration(count));
        tracing::trace!(iteration = count, "main function announced iteration");
    }

    /// Waits until at least `expected` iterations were announced.
    pub(crate) async fn wait_iters(&self, expected: u64) {
        if expected == 0 {
            return;
        }
        let mut rx = self.iters.subscribe();
        let _ = rx.wait_for(|n| *n >= expected).await;
    }

    pub(crate) fn iterations(&self) -> u64 {
        *self.iters.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn ready_event_published_once() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let signals = Signals::new(bus);

        signals.announce_ready();
        signals.announce_ready();

        assert_eq!(rx.recv().await.expect("event").kind, EventKind::ReadyAnnounced);
        assert!(rx.try_recv().is_err());
        assert_eq!(signals.state.get(), ExecutionState::Ready);
    }

    #[tokio::test]
    async fn wait_iters_blocks_until_count() {
        let signals = Arc::new(Signals::new(Bus::new(8)));
        signals.wait_iters(0).await;

        signals.announce_iter();
        let short = tokio::time::timeout(Duration::from_millis(20), signals.wait_iters(2)).await;
        assert!(short.is_err(), "one announcement must not satisfy two");

        signals.announce_iter();
        signals.wait_iters(2).await;
        assert_eq!(signals.iterations(), 2);
    }
}
