//! Harness core: execution control and lifecycle.
//!
//! The public API from this module is [`Execution`] (with [`ExecutionBuilder`] and
//! [`ExecutionState`]) plus the standalone runners [`run_main`] and
//! [`run_main_with_shutdown`].
//!
//! Internal modules:
//! - [`execution`]: the controller handed to tests;
//! - [`runner`]: runs one entry point, catching panics;
//! - [`signals`]: readiness latch, iteration counter and state shared with the entry point;
//! - [`runtime`]: runs an entry point outside tests, wired to OS signals;
//! - [`shutdown`]: cross-platform shutdown signal handling.

mod builder;
mod execution;
mod latch;
mod runner;
mod runtime;
mod shutdown;
mod signals;
mod state;

pub use builder::ExecutionBuilder;
pub use execution::{EXPECT_AFTER_START, Execution, QUIT_WHILE_DONE};
pub use runtime::{run_main, run_main_with_shutdown};
pub(crate) use signals::Signals;
pub use state::ExecutionState;
