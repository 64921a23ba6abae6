//! # Lifecycle events emitted by an execution.
//!
//! The [`EventKind`] enum classifies what happened to one run of an entry point:
//! - **Lifecycle**: started, ready, iteration, completed
//! - **Control**: quit requested/delivered, stop requested
//! - **Diagnostics**: hook fired, panic caught
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use mainvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::IterationAnnounced).with_iteration(2);
//! assert_eq!(ev.kind, EventKind::IterationAnnounced);
//! assert_eq!(ev.iteration, Some(2));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of execution events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Background task spawned.
    Started,

    /// Entry point called its ready announcer (first call only).
    ReadyAnnounced,

    /// Entry point announced one iteration.
    ///
    /// Sets:
    /// - `iteration`: running count (1-based)
    IterationAnnounced,

    /// Test code asked for a cooperative quit.
    QuitRequested,

    /// Quit signal handed to the entry point.
    QuitDelivered,

    /// Test code cancelled the execution token.
    StopRequested,

    /// A fatal or error hook was invoked.
    ///
    /// Sets:
    /// - `reason`: the first hook argument
    HookFired,

    /// Entry point returned.
    ///
    /// Sets:
    /// - `reason`: error text, when it returned an error
    Completed,

    /// Entry point panicked (reported in addition to `Completed`).
    ///
    /// Sets:
    /// - `reason`: panic info
    Panicked,
}

/// Execution event with optional metadata.
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Iteration count, for [`EventKind::IterationAnnounced`].
    pub iteration: Option<u64>,
    /// Human-readable reason (error text, hook message, panic info).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            iteration: None,
            reason: None,
        }
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches an iteration count.
    #[inline]
    pub fn with_iteration(mut self, n: u64) -> Self {
        self.iteration = Some(n);
        self
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, EventKind::Completed)
    }
}
