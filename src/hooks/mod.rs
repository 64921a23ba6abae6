//! # Fatal/error capture seam.
//!
//! The execution controller never aborts a test directly. When it needs to report
//! "the entry point finished while we were trying to quit it" or a misuse of the
//! controller, it calls a [`Hooks`] implementation injected at construction time.
//!
//! ## Implementations
//! - [`PanicHooks`] (default) - logs and panics, failing the current test.
//! - [`CaptureHooks`] - records every call for later assertions.
//!
//! ```text
//! Execution ── quit after return ──► hooks.fatal(["... while ...: <err>"])
//!           └─ expect_iters after start ──► hooks.error(["..."])
//! ```
//!
//! Hooks are per-execution values, so tests that capture do not interfere with
//! each other even when they run in parallel.

mod capture;
mod hook;
mod panic;

pub use capture::{Captured, CaptureHooks, HookKind};
pub use hook::{HookRef, Hooks};
pub use panic::PanicHooks;
