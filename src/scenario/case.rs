//! # One named scenario case.
//!
//! [`ScenarioCase`] bundles the arguments, the expected error text and the optional
//! `before`/`during`/`after` callbacks. Built with a fluent API:
//!
//! ```rust
//! use mainvisor::ScenarioCase;
//!
//! let case = ScenarioCase::new("graceful")
//!     .args(["--port", "0"])
//!     .during(|_ctx, exec| async move {
//!         exec.ready().await;
//!         exec.quit_signal().await;
//!     })
//!     .after(|logs| assert!(logs.filter_message("panic").is_empty()));
//!
//! assert_eq!(case.name(), "graceful");
//! assert_eq!(case.expected_err(), "");
//! ```

use std::borrow::Cow;
use std::future::Future;

use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use crate::{
    core::Execution,
    logging::{Logger, ObservedLogs},
};

/// Runs before the execution starts.
pub type BeforeFn = Box<dyn FnOnce(&Logger, &Execution) + Send>;

/// Drives the running execution.
pub type DuringFn = Box<dyn FnOnce(CancellationToken, Execution) -> BoxFuture<'static, ()> + Send>;

/// Asserts on what was observed once the execution is done.
pub type AfterFn = Box<dyn FnOnce(&ObservedLogs) + Send>;

/// A named input to the [`Scenario`](crate::Scenario) runner.
pub struct ScenarioCase {
    pub(crate) name: Cow<'static, str>,
    pub(crate) args: Vec<String>,
    pub(crate) err: String,
    pub(crate) before: Option<BeforeFn>,
    pub(crate) during: Option<DuringFn>,
    pub(crate) after: Option<AfterFn>,
}

impl ScenarioCase {
    /// Creates a case with no arguments, expecting no error.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            err: String::new(),
            before: None,
            during: None,
            after: None,
        }
    }

    /// Sets the arguments (the program name is prepended by the runner).
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the expected error text. Empty means "no error".
    pub fn expect_err(mut self, err: impl Into<String>) -> Self {
        self.err = err.into();
        self
    }

    /// Sets the callback run before [`Execution::start`].
    pub fn before<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&Logger, &Execution) + Send + 'static,
    {
        self.before = Some(Box::new(f));
        self
    }

    /// Sets the callback that drives readiness/quit/iteration choreography.
    ///
    /// The token is a child of the execution's token: [`Execution::stop`] cancels it,
    /// and the runner cancels it once the callback's future completes.
    pub fn during<F, Fut>(mut self, f: F) -> Self
    where
        F: FnOnce(CancellationToken, Execution) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let during = move |ctx: CancellationToken, exec: Execution| -> BoxFuture<'static, ()> {
            Box::pin(f(ctx, exec))
        };
        self.during = Some(Box::new(during));
        self
    }

    /// Sets the callback run after the completion check.
    pub fn after<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&ObservedLogs) + Send + 'static,
    {
        self.after = Some(Box::new(f));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    pub fn expected_err(&self) -> &str {
        &self.err
    }
}

impl std::fmt::Debug for ScenarioCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioCase")
            .field("name", &self.name)
            .field("args", &self.args)
            .field("err", &self.err)
            .field("before", &self.before.is_some())
            .field("during", &self.during.is_some())
            .field("after", &self.after.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let case = ScenarioCase::new("c")
            .args(["1", "2"])
            .expect_err("whoops")
            .before(|_logger, _exec| {});

        assert_eq!(case.name(), "c");
        assert_eq!(case.arguments(), ["1", "2"]);
        assert_eq!(case.expected_err(), "whoops");
        assert!(case.before.is_some());
        assert!(case.during.is_none());
        assert!(format!("{case:?}").contains("before: true"));
    }
}
