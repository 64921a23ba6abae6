//! # Execution lifecycle state.
//!
//! ```text
//! Created ──► Running ──► Ready ──► QuitRequested ──► CancelRequested ──► Done
//!                │           │            ▲                  ▲             ▲
//!                └───────────┴────────────┴──────────────────┴─────────────┘
//! ```
//!
//! ## Rules
//! - State only moves forward; a request that would move it backwards is ignored.
//! - `Done` is terminal and entered exactly once.

use std::sync::Mutex;

/// Observable lifecycle of one execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ExecutionState {
    /// Built, not started.
    Created,
    /// Entry point running, readiness not announced yet.
    Running,
    /// Entry point announced readiness.
    Ready,
    /// Cooperative quit requested.
    QuitRequested,
    /// Execution token cancelled.
    CancelRequested,
    /// Entry point returned; completion is available.
    Done,
}

impl ExecutionState {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ExecutionState::Created => "created",
            ExecutionState::Running => "running",
            ExecutionState::Ready => "ready",
            ExecutionState::QuitRequested => "quit_requested",
            ExecutionState::CancelRequested => "cancel_requested",
            ExecutionState::Done => "done",
        }
    }
}

/// Forward-only state holder.
#[derive(Debug)]
pub(crate) struct StateCell {
    state: Mutex<ExecutionState>,
}

impl StateCell {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(ExecutionState::Created),
        }
    }

    pub(crate) fn get(&self) -> ExecutionState {
        *self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Moves to `next` if it is later in the lifecycle. Returns `true` on change.
    pub(crate) fn advance(&self, next: ExecutionState) -> bool {
        let mut cur = self.state.lock().unwrap_or_else(|p| p.into_inner());
        if next > *cur {
            *cur = next;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_moves_forward() {
        let cell = StateCell::new();
        assert_eq!(cell.get(), ExecutionState::Created);
        assert!(cell.advance(ExecutionState::Running));
        assert!(cell.advance(ExecutionState::QuitRequested));
        assert!(!cell.advance(ExecutionState::Ready));
        assert_eq!(cell.get(), ExecutionState::QuitRequested);
    }

    #[test]
    fn done_is_terminal() {
        let cell = StateCell::new();
        assert!(cell.advance(ExecutionState::Done));
        assert!(!cell.advance(ExecutionState::Done));
        assert!(!cell.advance(ExecutionState::CancelRequested));
        assert_eq!(cell.get().as_label(), "done");
    }
}
