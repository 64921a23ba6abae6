//! Execution events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Execution` (start, quit, stop, completion) and the
//!   announcers inside `MainContext` (ready, iterations).
//! - **Consumers**: whoever called [`Execution::subscribe`](crate::Execution::subscribe).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
