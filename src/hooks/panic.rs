//! # Default hooks: fail the current test.

use super::Hooks;

/// Hooks that log the report and panic.
///
/// Inside a `#[tokio::test]` the panic fails the test. The panic happens on the
/// task that called the controller, never on the entry point's task.
#[derive(Debug, Default, Clone, Copy)]
pub struct PanicHooks;

impl Hooks for PanicHooks {
    fn fatal(&self, args: &[String]) {
        let msg = args.join(" ");
        tracing::error!(hook = "fatal", "{msg}");
        panic!("{msg}");
    }

    fn error(&self, args: &[String]) {
        let msg = args.join(" ");
        tracing::error!(hook = "error", "{msg}");
        panic!("error: {msg}");
    }
}
