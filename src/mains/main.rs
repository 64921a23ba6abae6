//! # Entry-point trait.
//!
//! A [`Main`] has a stable [`name`](Main::name) and a [`spawn`](Main::spawn) method
//! that creates a fresh future for one run. The future owns its [`MainContext`],
//! its argument list (program name first) and its [`Logger`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::MainError;
use crate::logging::Logger;
use crate::mains::MainContext;

/// Boxed future returned by [`Main::spawn`].
pub type BoxMainFuture = Pin<Box<dyn Future<Output = Result<(), MainError>> + Send + 'static>>;

/// # Long-running, cancellable entry point.
///
/// Implementations should announce readiness once initialized, wait on the quit
/// signal and/or cancellation, and return their terminal result.
///
/// # Example
/// ```
/// use mainvisor::{BoxMainFuture, Logger, Main, MainContext};
///
/// struct Server;
///
/// impl Main for Server {
///     fn name(&self) -> &str { "server" }
///
///     fn spawn(&self, mut ctx: MainContext, _args: Vec<String>, logger: Logger) -> BoxMainFuture {
///         Box::pin(async move {
///             logger.info("listening");
///             ctx.ready_fn().announce();
///             ctx.quit_signal().await;
///             Ok(())
///         })
///     }
/// }
/// ```
pub trait Main: Send + Sync + 'static {
    /// Returns a stable, human-readable name.
    fn name(&self) -> &str;

    /// Creates a new future for one run.
    fn spawn(&self, ctx: MainContext, args: Vec<String>, logger: Logger) -> BoxMainFuture;
}

/// Shared handle to an entry point.
pub type MainRef = Arc<dyn Main>;
