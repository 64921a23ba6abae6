//! # Scenario runner.
//!
//! Runs an ordered list of named [`ScenarioCase`]s against one entry point.
//!
//! ## Per-case flow
//! ```text
//! Logger::observed() ──► Execution::builder(main).args(case.args)
//!        │
//!        ├─► before(&logger, &exec)
//!        ├─► exec.start()
//!        ├─► during(ctx, exec).await      (optional; ctx is a child of the stop token)
//!        ├─► exec.stop(); exec.done().await ──► compare with case.err
//!        └─► after(&logs)
//! ```
//!
//! ## Rules
//! - Cases run sequentially; each gets its own `Execution` and `Logger`.
//! - The hooks instance is shared across cases; `before` is where it gets reset.
//! - Without `during` the entry point is only stopped. One that blocks on quit hangs the test.
//! - Unnamed cases are reported by their index.
//! - The first failing case stops the run.

mod case;
mod runner;

pub use case::{AfterFn, BeforeFn, DuringFn, ScenarioCase};
pub use runner::Scenario;
