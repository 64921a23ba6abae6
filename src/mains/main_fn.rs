//! # Function-backed entry point (`MainFn`)
//!
//! [`MainFn`] wraps a closure `F: Fn(MainContext, Vec<String>, Logger) -> Fut`,
//! producing a fresh future per run.
//!
//! ## Concurrency semantics
//! - Each [`Main::spawn`] call creates a **new** future that owns its state.
//! - There is no hidden mutation between runs; share state explicitly through `Arc<...>`.
//!
//! ## Example
//! ```rust
//! use mainvisor::{Logger, MainContext, MainError, MainFn, MainRef};
//!
//! let m: MainRef = MainFn::arc("echo", |mut ctx: MainContext, args: Vec<String>, logger: Logger| async move {
//!     logger.info(format!("args={args:?}"));
//!     ctx.ready_fn().announce();
//!     ctx.quit_signal().await;
//!     Ok::<_, MainError>(())
//! });
//!
//! assert_eq!(m.name(), "echo");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use crate::error::MainError;
use crate::logging::Logger;
use crate::mains::main::{BoxMainFuture, Main};
use crate::mains::MainContext;

/// Function-backed entry point.
#[derive(Debug)]
pub struct MainFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F, Fut> MainFn<F>
where
    F: Fn(MainContext, Vec<String>, Logger) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), MainError>> + Send + 'static,
{
    /// Creates a new function-backed entry point.
    ///
    /// Prefer [`MainFn::arc`] when you immediately need a [`MainRef`](crate::MainRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the entry point and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F, Fut> Main for MainFn<F>
where
    F: Fn(MainContext, Vec<String>, Logger) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<(), MainError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn spawn(&self, ctx: MainContext, args: Vec<String>, logger: Logger) -> BoxMainFuture {
        Box::pin((self.f)(ctx, args, logger))
    }
}
