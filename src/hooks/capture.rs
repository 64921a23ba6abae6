//! # Capturing hooks for assertions.
//!
//! [`CaptureHooks`] records each call into a shared slot. Clones share the slot,
//! so a test keeps one handle for assertions and gives another to the controller.
//!
//! ## Example
//! ```
//! use mainvisor::{CaptureHooks, Hooks};
//!
//! let capture = CaptureHooks::new();
//! let seam = capture.clone();
//! seam.fatal(&["stopped while busy".to_string()]);
//!
//! assert_eq!(capture.fatal_calls().len(), 1);
//! capture.reset();
//! assert!(capture.is_empty());
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use super::Hooks;

/// Which hook was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    Fatal,
    Error,
}

/// One recorded hook call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captured {
    /// Which hook fired.
    pub kind: HookKind,
    /// Arguments passed by the controller.
    pub args: Vec<String>,
}

impl Captured {
    /// Returns `true` if any argument contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.args.iter().any(|a| a.contains(needle))
    }
}

/// Hooks that record instead of failing.
#[derive(Debug, Default, Clone)]
pub struct CaptureHooks {
    calls: Arc<Mutex<Vec<Captured>>>,
}

impl CaptureHooks {
    /// Creates an empty capture slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears everything recorded so far.
    pub fn reset(&self) {
        self.lock().clear();
    }

    /// Returns all recorded calls in order.
    pub fn calls(&self) -> Vec<Captured> {
        self.lock().clone()
    }

    /// Returns the argument lists of all `fatal` calls.
    pub fn fatal_calls(&self) -> Vec<Vec<String>> {
        self.of_kind(HookKind::Fatal)
    }

    /// Returns the argument lists of all `error` calls.
    pub fn error_calls(&self) -> Vec<Vec<String>> {
        self.of_kind(HookKind::Error)
    }

    /// Returns the most recent `fatal` call, if any.
    pub fn last_fatal(&self) -> Option<Vec<String>> {
        self.lock()
            .iter()
            .rev()
            .find(|c| c.kind == HookKind::Fatal)
            .map(|c| c.args.clone())
    }

    /// Number of recorded hook calls.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no hook fired.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn of_kind(&self, kind: HookKind) -> Vec<Vec<String>> {
        self.lock()
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.args.clone())
            .collect()
    }

    fn record(&self, kind: HookKind, args: &[String]) {
        self.lock().push(Captured {
            kind,
            args: args.to_vec(),
        });
    }

    // A test that panicked while asserting must not poison later reads.
    fn lock(&self) -> MutexGuard<'_, Vec<Captured>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Hooks for CaptureHooks {
    fn fatal(&self, args: &[String]) {
        self.record(HookKind::Fatal, args);
    }

    fn error(&self, args: &[String]) {
        self.record(HookKind::Error, args);
    }
}
