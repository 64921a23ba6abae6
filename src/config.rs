//! # Harness configuration.
//!
//! Provides [`HarnessConfig`] centralized settings shared by
//! [`Execution`](crate::Execution) and [`Scenario`](crate::Scenario).
//!
//! ## Sentinel values
//! - `bus_capacity = 0` → clamped to 1
//! - `log_filter = ""` → falls back to [`DEFAULT_LOG_FILTER`]

use std::borrow::Cow;

/// Program-name token prepended to every argument list.
pub const DEFAULT_PROGRAM_NAME: &str = "main";

/// Filter directive used when none is configured.
pub const DEFAULT_LOG_FILTER: &str = "debug";

/// Settings for executions and scenarios.
///
/// ## Field semantics
/// - `program_name`: token placed at `args[0]` of every execution
/// - `log_filter`: `EnvFilter` directive for scenario loggers (e.g. `"info,my_crate=trace"`)
/// - `echo_logs`: mirror observed logs to the test output
/// - `bus_capacity`: lifecycle event ring buffer size (min 1)
#[derive(Clone, Debug)]
pub struct HarnessConfig {
    /// Token prepended to the argument list.
    pub program_name: Cow<'static, str>,

    /// Filter directive for loggers built by the scenario runner.
    pub log_filter: String,

    /// Whether observed loggers also print through the test writer.
    ///
    /// Output is captured by libtest and shown only for failing tests.
    pub echo_logs: bool,

    /// Capacity of the per-execution lifecycle event channel.
    ///
    /// Receivers lagging more than `bus_capacity` events observe `Lagged`.
    pub bus_capacity: usize,
}

impl HarnessConfig {
    /// Returns the full argument list for an execution: program name first.
    ///
    /// # Example
    /// ```
    /// use mainvisor::HarnessConfig;
    ///
    /// let cfg = HarnessConfig::default();
    /// assert_eq!(cfg.argv(["1", "2"]), vec!["main", "1", "2"]);
    /// ```
    pub fn argv<I, S>(&self, args: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        std::iter::once(self.program_name.to_string())
            .chain(args.into_iter().map(Into::into))
            .collect()
    }

    /// Returns the log filter directive, substituting the default for an empty one.
    #[inline]
    pub fn log_filter_or_default(&self) -> &str {
        if self.log_filter.trim().is_empty() {
            DEFAULT_LOG_FILTER
        } else {
            &self.log_filter
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for HarnessConfig {
    /// Default configuration:
    ///
    /// - `program_name = "main"`
    /// - `log_filter = "debug"`
    /// - `echo_logs = true`
    /// - `bus_capacity = 256`
    fn default() -> Self {
        Self {
            program_name: Cow::Borrowed(DEFAULT_PROGRAM_NAME),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            echo_logs: true,
            bus_capacity: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argv_prepends_program_name() {
        let cfg = HarnessConfig::default();
        assert_eq!(cfg.argv(["1", "2", "3"]), vec!["main", "1", "2", "3"]);
        assert_eq!(cfg.argv(Vec::<String>::new()), vec!["main"]);
    }

    #[test]
    fn custom_program_name() {
        let cfg = HarnessConfig {
            program_name: "daemon".into(),
            ..HarnessConfig::default()
        };
        assert_eq!(cfg.argv(["x"]), vec!["daemon", "x"]);
    }

    #[test]
    fn sentinels_fall_back() {
        let cfg = HarnessConfig {
            log_filter: "  ".into(),
            bus_capacity: 0,
            ..HarnessConfig::default()
        };
        assert_eq!(cfg.log_filter_or_default(), DEFAULT_LOG_FILTER);
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
