//! # Hook trait.

use std::sync::Arc;

/// Substitutable stand-in for a process-terminating or test-failing call.
///
/// `args` is the ordered list of message parts the controller wanted to report.
///
/// # Example
/// ```
/// use std::sync::Mutex;
/// use mainvisor::Hooks;
///
/// #[derive(Default)]
/// struct Count(Mutex<usize>);
///
/// impl Hooks for Count {
///     fn fatal(&self, _args: &[String]) {
///         *self.0.lock().unwrap() += 1;
///     }
///     fn error(&self, args: &[String]) {
///         self.fatal(args);
///     }
/// }
/// ```
pub trait Hooks: Send + Sync + 'static {
    /// Called where a real harness would abort the test (or the process).
    fn fatal(&self, args: &[String]);

    /// Called where a real harness would mark the test as failed and continue.
    fn error(&self, args: &[String]);
}

/// Shared handle to a hooks implementation.
pub type HookRef = Arc<dyn Hooks>;
