//! # Entry-point abstractions.
//!
//! This module provides the types an entry point is written against:
//! - [`Main`] - trait for async, cancellable "main" routines
//! - [`MainFn`] - closure-backed implementation
//! - [`MainRef`] - shared reference to an entry point (`Arc<dyn Main>`)
//! - [`MainContext`] - signals handed to one run (ready, quit, iterations, cancellation)

mod context;
mod main;
mod main_fn;

pub use context::{IterFn, MainContext, ReadyFn};
pub(crate) use context::QuitAck;
pub use main::{BoxMainFuture, Main, MainRef};
pub use main_fn::MainFn;
