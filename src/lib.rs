//! # mainvisor
//!
//! **Mainvisor** is a deterministic test harness for long-running async entry points
//! (the "main" of a daemon, worker or server).
//!
//! It runs the entry point in the background and lets a test drive it step by step:
//! wait until it is ready, wait for a number of loop iterations, ask it to quit
//! cooperatively, cancel it, and collect its result. Failures that a test cannot
//! observe by return value (quitting an entry point that already returned, misusing
//! the controller) are routed through injectable [`Hooks`].
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  test code                                     entry point (Main)
//! ┌──────────────────────┐                      ┌──────────────────────────┐
//! │ Execution            │  spawn(ctx, args,    │ async fn(MainContext,    │
//! │  start()             │        logger) ────► │          Vec<String>,    │
//! │  ready().await       │ ◄── ReadyFn ──────── │          Logger)         │
//! │  expect_iters(n)     │                      │                          │
//! │  wait_iters().await  │ ◄── IterFn ───────── │  loop { .. iter() .. }   │
//! │  quit_signal().await │ ──── quit + ack ───► │  ctx.quit_signal()       │
//! │  stop()              │ ──── cancel ───────► │  ctx.cancelled()         │
//! │  done().await        │ ◄── Result ───────── │  return Ok / Err         │
//! └──────────┬───────────┘                      └──────────────────────────┘
//!            │ misuse / quit after return
//!            ▼
//!     Hooks::fatal / Hooks::error      (PanicHooks | CaptureHooks | custom)
//!
//!  Bus (broadcast): Started, ReadyAnnounced, IterationAnnounced, QuitRequested,
//!                   QuitDelivered, StopRequested, HookFired, Completed, Panicked
//! ```
//!
//! ### Lifecycle
//! ```text
//! Created ─► Running ─► Ready ─► QuitRequested ─► CancelRequested ─► Done
//! ```
//! States only move forward; a step may be skipped (an entry point that returns
//! right away goes `Running ─► Done`).
//!
//! ## Features
//! | Area              | Description                                                  | Key types                               |
//! |-------------------|--------------------------------------------------------------|-----------------------------------------|
//! | **Controller**    | Start, synchronize, quit, stop and await one entry point.    | [`Execution`], [`ExecutionBuilder`]     |
//! | **Entry points**  | Write entry points as closures or trait objects.             | [`Main`], [`MainFn`], [`MainContext`]   |
//! | **Hooks**         | Capture fatal/error reports instead of aborting.             | [`Hooks`], [`PanicHooks`], [`CaptureHooks`] |
//! | **Scenarios**     | Table of named cases with before/during/after callbacks.     | [`Scenario`], [`ScenarioCase`]          |
//! | **Logging**       | `tracing`-backed loggers with an in-memory observer.         | [`Logger`], [`ObservedLogs`]            |
//! | **Events**        | Lifecycle events on a broadcast bus.                         | [`Event`], [`EventKind`]                |
//! | **Production**    | Run the same entry point wired to OS signals.                | [`run_main`], [`run_main_with_shutdown`] |
//!
//! ## Example
//! ```rust
//! use mainvisor::{Execution, HarnessConfig, Logger, MainContext, MainError, MainFn, MainRef};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let service: MainRef = MainFn::arc(
//!         "service",
//!         |mut ctx: MainContext, _args: Vec<String>, logger: Logger| async move {
//!             ctx.ready_fn().announce();
//!             logger.info("serving");
//!             ctx.quit_signal().await;
//!             Err(MainError::fail("shutting down"))
//!         },
//!     );
//!
//!     let (logger, logs) = Logger::observed(&HarnessConfig::default());
//!     let exec = Execution::new(service, ["--port", "0"], logger);
//!     exec.start().expect("first start");
//!     exec.ready().await;
//!     exec.quit_signal().await;
//!     exec.stop();
//!
//!     let err = exec.done().await.unwrap_err();
//!     assert_eq!(err.to_string(), "shutting down");
//!     assert_eq!(logs.filter_message("serving").len(), 1);
//! }
//! ```
mod config;
mod core;
mod error;
mod events;
mod hooks;
mod logging;
mod mains;
mod scenario;

// ---- Public re-exports ----

pub use config::{DEFAULT_LOG_FILTER, DEFAULT_PROGRAM_NAME, HarnessConfig};
pub use core::{
    EXPECT_AFTER_START, Execution, ExecutionBuilder, ExecutionState, QUIT_WHILE_DONE, run_main,
    run_main_with_shutdown,
};
pub use error::{HarnessError, MainError, ScenarioError};
pub use events::{Bus, Event, EventKind};
pub use hooks::{CaptureHooks, Captured, HookKind, HookRef, Hooks, PanicHooks};
pub use logging::{LoggedEntry, Logger, ObservedLogs, ObserverLayer};
pub use mains::{BoxMainFuture, IterFn, Main, MainContext, MainFn, MainRef, ReadyFn};
pub use scenario::{AfterFn, BeforeFn, DuringFn, Scenario, ScenarioCase};
