//! Error types used by the harness and by entry points.
//!
//! This module defines three error enums:
//!
//! - [`MainError`] - terminal errors returned by an entry point (surfaced through
//!   [`Execution::done`](crate::Execution::done)).
//! - [`HarnessError`] - misuse of the execution controller that can be detected eagerly.
//! - [`ScenarioError`] - a scenario case whose completion did not match its expectation.
//!
//! [`MainError`] provides `as_label`/`as_message` helpers for logs, like the rest of the runtime.

use std::fmt::Display;

use thiserror::Error;

/// # Errors produced by an entry point.
///
/// The [`Display`] form of [`MainError::Fail`] is the bare message, so a scenario
/// expecting `"whoops"` matches an entry point returning `MainError::fail("whoops")`.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MainError {
    /// Entry point failed with a business error.
    #[error("{error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Non-recoverable error reported by the entry point.
    #[error("fatal error: {error}")]
    Fatal {
        /// The underlying error message.
        error: String,
    },

    /// Entry point observed cancellation and gave up.
    #[error("context cancelled")]
    Canceled,

    /// Entry point panicked; the panic was caught by the controller.
    #[error("main function panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl MainError {
    /// Shorthand for [`MainError::Fail`] from anything printable.
    ///
    /// # Example
    /// ```
    /// use mainvisor::MainError;
    ///
    /// let err = MainError::fail("whoops");
    /// assert_eq!(err.to_string(), "whoops");
    /// ```
    pub fn fail(error: impl Display) -> Self {
        MainError::Fail {
            error: error.to_string(),
        }
    }

    /// Shorthand for [`MainError::Fatal`].
    pub fn fatal(error: impl Display) -> Self {
        MainError::Fatal {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            MainError::Fail { .. } => "main_failed",
            MainError::Fatal { .. } => "main_fatal",
            MainError::Canceled => "main_canceled",
            MainError::Panicked { .. } => "main_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            MainError::Fail { error } => format!("error: {error}"),
            MainError::Fatal { error } => format!("fatal: {error}"),
            MainError::Canceled => "context cancelled".to_string(),
            MainError::Panicked { info } => format!("panic: {info}"),
        }
    }
}

/// # Errors produced by the execution controller.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessError {
    /// [`Execution::start`](crate::Execution::start) was called a second time.
    #[error("execution already started")]
    AlreadyStarted,
}

/// # Errors produced by the scenario runner.
///
/// Every variant carries the name of the failing case.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScenarioError {
    /// The controller rejected an operation.
    #[error("case {case:?}: {source}")]
    Harness {
        /// Case name.
        case: String,
        /// Controller error.
        source: HarnessError,
    },

    /// An error was returned where none was expected.
    #[error("case {case:?}: expected no error, got {actual:?}")]
    UnexpectedError {
        /// Case name.
        case: String,
        /// Text of the returned error.
        actual: String,
    },

    /// No error was returned where one was expected.
    #[error("case {case:?}: expected error {expected:?}, got none")]
    MissingError {
        /// Case name.
        case: String,
        /// Expected error text.
        expected: String,
    },

    /// The returned error text differs from the expected text.
    #[error("case {case:?}: expected error {expected:?}, got {actual:?}")]
    ErrorMismatch {
        /// Case name.
        case: String,
        /// Expected error text.
        expected: String,
        /// Text of the returned error.
        actual: String,
    },
}

impl ScenarioError {
    /// Returns the name of the case that failed.
    pub fn case(&self) -> &str {
        match self {
            ScenarioError::Harness { case, .. }
            | ScenarioError::UnexpectedError { case, .. }
            | ScenarioError::MissingError { case, .. }
            | ScenarioError::ErrorMismatch { case, .. } => case,
        }
    }
}
