//! # Logger handle.

use std::fmt::Display;

use tracing::Dispatch;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;

use super::ObservedLogs;
use crate::config::{DEFAULT_LOG_FILTER, HarnessConfig};

/// Leveled logger passed to entry points.
///
/// Wraps a [`Dispatch`]; clones share it. Messages logged through the handle go to
/// that dispatcher regardless of the caller's thread-local default.
///
/// # Example
/// ```
/// use mainvisor::{HarnessConfig, Logger};
///
/// let (logger, logs) = Logger::observed(&HarnessConfig::default());
/// logger.info("hi");
/// assert_eq!(logs.filter_message("hi").len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct Logger {
    dispatch: Dispatch,
}

impl Logger {
    /// Builds a logger printing to stderr, filtered by `cfg.log_filter`.
    pub fn new(cfg: &HarnessConfig) -> Self {
        let subscriber = tracing_subscriber::registry()
            .with(env_filter(cfg))
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));
        Self::from_dispatch(Dispatch::new(subscriber))
    }

    /// Builds a logger with an attached [`ObservedLogs`] sink.
    ///
    /// With `cfg.echo_logs`, events are also written through the libtest writer.
    pub fn observed(cfg: &HarnessConfig) -> (Self, ObservedLogs) {
        let logs = ObservedLogs::new();
        let echo = cfg.echo_logs.then(|| {
            tracing_subscriber::fmt::layer()
                .with_test_writer()
                .with_ansi(false)
        });
        let subscriber = tracing_subscriber::registry()
            .with(env_filter(cfg))
            .with(logs.layer())
            .with(echo);
        (Self::from_dispatch(Dispatch::new(subscriber)), logs)
    }

    /// Wraps an existing dispatcher.
    pub fn from_dispatch(dispatch: Dispatch) -> Self {
        Self { dispatch }
    }

    /// Captures the caller's current default dispatcher.
    pub fn current() -> Self {
        Self::from_dispatch(tracing::dispatcher::get_default(Dispatch::clone))
    }

    /// Returns the underlying dispatcher.
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Runs `f` with this logger's dispatcher as the thread-local default.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    pub fn debug(&self, msg: impl Display) {
        self.in_scope(|| tracing::debug!("{msg}"));
    }

    pub fn info(&self, msg: impl Display) {
        self.in_scope(|| tracing::info!("{msg}"));
    }

    pub fn warn(&self, msg: impl Display) {
        self.in_scope(|| tracing::warn!("{msg}"));
    }

    pub fn error(&self, msg: impl Display) {
        self.in_scope(|| tracing::error!("{msg}"));
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::current()
    }
}

fn env_filter(cfg: &HarnessConfig) -> EnvFilter {
    EnvFilter::try_new(cfg.log_filter_or_default())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn leveled_messages_are_observed() {
        let (logger, logs) = Logger::observed(&HarnessConfig::default());
        logger.debug("d");
        logger.info("i");
        logger.warn("w");
        logger.error("e");

        assert_eq!(logs.len(), 4);
        assert_eq!(logs.filter_level(Level::ERROR)[0].message, "e");
    }

    #[test]
    fn filter_applies_to_observer() {
        let cfg = HarnessConfig {
            log_filter: "warn".into(),
            echo_logs: false,
            ..HarnessConfig::default()
        };
        let (logger, logs) = Logger::observed(&cfg);
        logger.info("dropped");
        logger.warn("kept");

        assert!(logs.filter_message("dropped").is_empty());
        assert_eq!(logs.filter_message("kept").len(), 1);
    }

    #[test]
    fn in_scope_routes_plain_macros() {
        let (logger, logs) = Logger::observed(&HarnessConfig::default());
        logger.in_scope(|| tracing::info!(answer = 42, "plain"));
        assert_eq!(logs.filter_field("answer", "42").len(), 1);
    }
}
