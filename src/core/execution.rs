//! # Execution: one controlled run of an entry point.
//!
//! [`Execution`] wraps a single invocation of a [`Main`](crate::Main) in a
//! background tokio task and exposes the synchronization protocol tests drive it with.
//!
//! ## Architecture
//! ```text
//! test code                         background task
//! ─────────                         ───────────────
//! start() ──────── spawn ─────────► run_once(main, ctx, args, logger)
//! ready().await   ◄── ReadyFn ────── ctx.ready_fn().announce()
//! expect_iters(n)
//! wait_iters()    ◄── IterFn ─────── ctx.iter_fn().announce()  (× n)
//! quit_signal() ─── quit + ack ────► ctx.quit_signal().await
//! stop() ───────── token.cancel ───► ctx.cancelled().await
//! done().await    ◄── completion ─── return Ok(()) | Err(e)
//! ```
//!
//! ## Rules
//! - The completion slot is written exactly once, before readiness is force-released,
//!   so `ready()` never hangs on an entry point that already returned.
//! - `quit_signal()` waits until the entry point **received** the signal. If the
//!   entry point returns first, the fatal hook fires with a message containing
//!   `"while"` (and the error text, if any).
//! - `stop()` only cancels the token; it never fires a hook.
//! - No operation imposes a timeout: waiting on something the entry point never
//!   does hangs the caller.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;
use tracing::instrument::WithSubscriber;

use super::builder::ExecutionBuilder;
use super::runner::run_once;
use super::signals::Signals;
use super::state::ExecutionState;
use crate::{
    error::{HarnessError, MainError},
    events::{Event, EventKind},
    hooks::HookRef,
    logging::Logger,
    mains::{MainContext, MainRef, QuitAck},
};

/// Message passed to the fatal hook when the entry point returned before taking the quit signal.
pub const QUIT_WHILE_DONE: &str = "main function completed while waiting to send quit signal";

/// Message passed to the error hook when iterations are expected after start.
pub const EXPECT_AFTER_START: &str = "expect_iters called after the execution started";

type Completion = Option<Result<(), MainError>>;

/// Handle to one run of an entry point.
///
/// Cheap to clone; all clones control the same run.
#[derive(Clone)]
pub struct Execution {
    inner: Arc<Inner>,
}

struct Inner {
    main: MainRef,
    args: Vec<String>,
    logger: Logger,
    hooks: HookRef,
    token: CancellationToken,
    signals: Arc<Signals>,
    expected_iters: AtomicU64,
    started: AtomicBool,
    quit_requested: AtomicBool,
    quit_tx: mpsc::Sender<QuitAck>,
    quit_rx: Mutex<Option<mpsc::Receiver<QuitAck>>>,
    done: watch::Sender<Completion>,
}

impl Execution {
    /// Binds `main` to `args` (program name prepended) and `logger`.
    ///
    /// Uses [`PanicHooks`](crate::PanicHooks) and the default configuration.
    pub fn new<I, S>(main: MainRef, args: I, logger: Logger) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::builder(main).args(args).logger(logger).build()
    }

    /// Returns a builder for an execution of `main`.
    pub fn builder(main: MainRef) -> ExecutionBuilder {
        ExecutionBuilder::new(main)
    }

    pub(crate) fn from_parts(
        main: MainRef,
        args: Vec<String>,
        logger: Logger,
        hooks: HookRef,
        signals: Signals,
    ) -> Self {
        let (quit_tx, quit_rx) = mpsc::channel(1);
        let (done, _rx) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                main,
                args,
                logger,
                hooks,
                token: CancellationToken::new(),
                signals: Arc::new(signals),
                expected_iters: AtomicU64::new(0),
                started: AtomicBool::new(false),
                quit_requested: AtomicBool::new(false),
                quit_tx,
                quit_rx: Mutex::new(Some(quit_rx)),
                done,
            }),
        }
    }

    /// Spawns the entry point on the current tokio runtime and returns immediately.
    ///
    /// # Errors
    /// [`HarnessError::AlreadyStarted`] if called more than once.
    ///
    /// # Panics
    /// If called outside a tokio runtime.
    pub fn start(&self) -> Result<(), HarnessError> {
        if self.inner.started.swap(true, Ordering::AcqRel) {
            return Err(HarnessError::AlreadyStarted);
        }
        let quit = self
            .inner
            .quit_rx
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .take()
            .ok_or(HarnessError::AlreadyStarted)?;

        let ctx = MainContext::attached(
            self.inner.token.clone(),
            Arc::clone(&self.inner.signals),
            quit,
        );
        self.inner.signals.state.advance(ExecutionState::Running);
        self.inner.signals.bus.publish(Event::new(EventKind::Started));
        self.inner.logger.in_scope(|| {
            tracing::debug!(main = self.inner.main.name(), args = ?self.inner.args, "starting main function");
        });

        let inner = Arc::clone(&self.inner);
        let dispatch = inner.logger.dispatch().clone();
        tokio::spawn(
            async move {
                let res = run_once(
                    &inner.main,
                    ctx,
                    inner.args.clone(),
                    inner.logger.clone(),
                    &inner.signals.bus,
                )
                .await;
                inner.finish(res);
            }
            .with_subscriber(dispatch),
        );
        Ok(())
    }

    /// Resolves once the entry point announced readiness, or once it returned.
    pub async fn ready(&self) {
        self.inner.signals.ready.wait().await;
    }

    /// Records that `n` iteration announcements are expected.
    ///
    /// Meant to be called before [`start`](Self::start); a later call is reported
    /// through the error hook and still takes effect.
    pub fn expect_iters(&self, n: u64) {
        if self.inner.started.load(Ordering::Acquire) {
            self.inner.report_error(vec![format!("{EXPECT_AFTER_START} (n={n})")]);
        }
        self.inner.expected_iters.store(n, Ordering::Release);
    }

    /// Resolves once the expected number of iterations were announced.
    ///
    /// Immediate when no expectation was recorded.
    pub async fn wait_iters(&self) {
        let expected = self.inner.expected_iters.load(Ordering::Acquire);
        self.inner.signals.wait_iters(expected).await;
    }

    /// Delivers the cooperative quit signal and waits until the entry point took it.
    ///
    /// If the entry point returns without taking it, the fatal hook fires with
    /// [`QUIT_WHILE_DONE`] (plus `": <error>"` when it returned an error).
    /// Repeated calls are ignored.
    pub async fn quit_signal(&self) {
        if self.inner.quit_requested.swap(true, Ordering::AcqRel) {
            self.inner.logger.in_scope(|| {
                tracing::warn!("quit signal already requested; ignoring");
            });
            return;
        }
        self.inner.signals.state.advance(ExecutionState::QuitRequested);
        self.inner.signals.bus.publish(Event::new(EventKind::QuitRequested));
        self.inner.logger.in_scope(|| tracing::debug!("sending quit signal"));

        let (ack_tx, mut ack_rx) = oneshot::channel();
        let received = match self.inner.quit_tx.try_send(ack_tx) {
            Ok(()) => {
                let mut done = self.inner.done.subscribe();
                tokio::select! {
                    biased;
                    res = &mut ack_rx => res.is_ok(),
                    _ = done.wait_for(Option::is_some) => ack_rx.try_recv().is_ok(),
                }
            }
            // Receiver gone: the entry point is finishing or finished.
            Err(_) => false,
        };

        if received {
            self.inner.signals.bus.publish(Event::new(EventKind::QuitDelivered));
            return;
        }

        let outcome = self.done().await;
        let msg = match outcome {
            Ok(()) => QUIT_WHILE_DONE.to_string(),
            Err(e) => format!("{QUIT_WHILE_DONE}: {e}"),
        };
        self.inner.report_fatal(vec![msg]);
    }

    /// Cancels the execution token. Idempotent.
    pub fn stop(&self) {
        if self.inner.token.is_cancelled() {
            return;
        }
        self.inner.token.cancel();
        self.inner
            .signals
            .state
            .advance(ExecutionState::CancelRequested);
        self.inner.signals.bus.publish(Event::new(EventKind::StopRequested));
        self.inner.logger.in_scope(|| tracing::debug!("stop requested"));
    }

    /// Waits for the entry point to return and yields its result.
    ///
    /// May be awaited any number of times; every call observes the same result.
    pub async fn done(&self) -> Result<(), MainError> {
        let mut rx = self.inner.done.subscribe();
        let outcome = rx
            .wait_for(Option::is_some)
            .await
            .ok()
            .and_then(|slot| slot.clone());
        // The sender lives in `inner`, so the slot is always filled here.
        outcome.unwrap_or(Err(MainError::Canceled))
    }

    /// Returns the result if the entry point already returned.
    pub fn try_done(&self) -> Option<Result<(), MainError>> {
        self.inner.done.borrow().clone()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ExecutionState {
        self.inner.signals.state.get()
    }

    /// Subscribes to lifecycle events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.inner.signals.bus.subscribe()
    }

    /// Child of the execution token; [`stop`](Self::stop) cancels it too.
    pub(crate) fn child_token(&self) -> CancellationToken {
        self.inner.token.child_token()
    }

    /// Number of iterations announced so far.
    pub fn iterations(&self) -> u64 {
        self.inner.signals.iterations()
    }

    /// Argument list passed to the entry point (program name first).
    pub fn args(&self) -> &[String] {
        &self.inner.args
    }

    /// Logger handed to the entry point.
    pub fn logger(&self) -> &Logger {
        &self.inner.logger
    }

    /// Whether [`start`](Self::start) has been called.
    pub fn is_started(&self) -> bool {
        self.inner.started.load(Ordering::Acquire)
    }
}

impl Inner {
    fn finish(&self, res: Result<(), MainError>) {
        self.signals.state.advance(ExecutionState::Done);
        match &res {
            Ok(()) => tracing::debug!(main = self.main.name(), "main function returned"),
            Err(e) => tracing::debug!(
                main = self.main.name(),
                label = e.as_label(),
                error = %e,
                "main function returned error"
            ),
        }
        let ev = match &res {
            Ok(()) => Event::new(EventKind::Completed),
            Err(e) => Event::new(EventKind::Completed).with_reason(e.to_string()),
        };
        self.done.send_replace(Some(res));
        self.signals.ready.open();
        self.signals.bus.publish(ev);
    }

    fn report_fatal(&self, args: Vec<String>) {
        self.publish_hook(&args);
        self.logger
            .in_scope(|| tracing::error!(hook = "fatal", args = ?args, "main function fatal"));
        self.hooks.fatal(&args);
    }

    fn report_error(&self, args: Vec<String>) {
        self.publish_hook(&args);
        self.logger
            .in_scope(|| tracing::error!(hook = "error", args = ?args, "harness misuse"));
        self.hooks.error(&args);
    }

    fn publish_hook(&self, args: &[String]) {
        let mut ev = Event::new(EventKind::HookFired);
        if let Some(first) = args.first() {
            ev = ev.with_reason(first.as_str());
        }
        self.signals.bus.publish(ev);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::hooks::CaptureHooks;
    use crate::mains::MainFn;

    fn whoops() -> MainError {
        MainError::fail("whoops")
    }

    fn returning(result: Result<(), MainError>) -> MainRef {
        MainFn::arc(
            "fixed",
            move |_ctx: MainContext, _args: Vec<String>, _logger: Logger| {
                let result = result.clone();
                async move { result }
            },
        )
    }

    fn exec(main: MainRef, args: &[&str], capture: &CaptureHooks) -> Execution {
        Execution::builder(main)
            .args(args.iter().copied())
            .hooks(capture.clone())
            .build()
    }

    fn recording(seen: Arc<Mutex<Vec<String>>>, result: Result<(), MainError>, iters: u64) -> MainRef {
        MainFn::arc(
            "recording",
            move |mut ctx: MainContext, args: Vec<String>, _logger: Logger| {
                let seen = Arc::clone(&seen);
                let result = result.clone();
                async move {
                    *seen.lock().unwrap() = args;
                    ctx.ready_fn().announce();
                    for _ in 0..iters {
                        ctx.iter_fn().announce();
                    }
                    ctx.quit_signal().await;
                    result
                }
            },
        )
    }

    #[tokio::test]
    async fn error_without_quit_fires_no_hook() {
        let capture = CaptureHooks::new();
        let exec = exec(returning(Err(whoops())), &[], &capture);
        exec.start().unwrap();
        exec.ready().await;
        exec.stop();

        assert_eq!(exec.done().await, Err(whoops()));
        assert!(capture.is_empty());
    }

    #[tokio::test]
    async fn quit_after_error_return_fires_fatal_with_error_text() {
        let capture = CaptureHooks::new();
        let exec = exec(returning(Err(whoops())), &[], &capture);
        exec.start().unwrap();
        exec.ready().await;
        exec.quit_signal().await;
        exec.stop();

        assert_eq!(exec.done().await, Err(whoops()));
        let fatal = capture.fatal_calls();
        assert_eq!(fatal.len(), 1);
        assert!(fatal[0][0].contains("while"));
        assert!(fatal[0][0].contains("whoops"));
    }

    #[tokio::test]
    async fn ok_without_quit_fires_no_hook() {
        let capture = CaptureHooks::new();
        let exec = exec(returning(Ok(())), &[], &capture);
        exec.start().unwrap();
        exec.ready().await;
        exec.stop();

        assert_eq!(exec.done().await, Ok(()));
        assert!(capture.is_empty());
    }

    #[tokio::test]
    async fn quit_after_ok_return_fires_fatal_without_error_text() {
        let capture = CaptureHooks::new();
        let exec = exec(returning(Ok(())), &[], &capture);
        exec.start().unwrap();
        exec.ready().await;
        exec.quit_signal().await;
        exec.stop();

        assert_eq!(exec.done().await, Ok(()));
        let fatal = capture.fatal_calls();
        assert_eq!(fatal.len(), 1);
        assert!(fatal[0][0].contains("while"));
        assert!(!fatal[0][0].contains("whoops"));
    }

    #[tokio::test]
    async fn quit_taken_by_main_passes_args_through() {
        let capture = CaptureHooks::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let exec = exec(recording(Arc::clone(&seen), Ok(()), 0), &["1", "2", "3"], &capture);
        exec.start().unwrap();
        exec.ready().await;
        exec.quit_signal().await;
        exec.stop();

        assert_eq!(exec.done().await, Ok(()));
        assert!(capture.is_empty());
        assert_eq!(*seen.lock().unwrap(), vec!["main", "1", "2", "3"]);
    }

    #[tokio::test]
    async fn waits_for_expected_iterations() {
        let capture = CaptureHooks::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let exec = exec(recording(Arc::clone(&seen), Err(whoops()), 2), &["1", "2", "3"], &capture);
        exec.expect_iters(2);
        exec.start().unwrap();
        exec.ready().await;
        exec.wait_iters().await;
        assert_eq!(exec.iterations(), 2);
        exec.quit_signal().await;
        exec.stop();

        assert_eq!(exec.done().await, Err(whoops()));
        assert!(capture.is_empty());
        assert_eq!(*seen.lock().unwrap(), vec!["main", "1", "2", "3"]);
    }

    #[tokio::test]
    async fn fewer_iterations_leave_wait_pending() {
        let capture = CaptureHooks::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let exec = exec(recording(seen, Ok(()), 1), &[], &capture);
        exec.expect_iters(2);
        exec.start().unwrap();
        exec.ready().await;

        let waited = tokio::time::timeout(Duration::from_millis(50), exec.wait_iters()).await;
        assert!(waited.is_err(), "wait_iters must not resolve after one of two iterations");

        exec.quit_signal().await;
        assert_eq!(exec.done().await, Ok(()));
    }

    #[tokio::test]
    async fn stop_cancels_main_waiting_on_token() {
        let capture = CaptureHooks::new();
        let main: MainRef = MainFn::arc(
            "until-cancelled",
            |ctx: MainContext, _args: Vec<String>, _logger: Logger| async move {
                ctx.ready_fn().announce();
                ctx.cancelled().await;
                Err(MainError::Canceled)
            },
        );
        let exec = exec(main, &[], &capture);
        exec.start().unwrap();
        exec.ready().await;
        assert_eq!(exec.state(), ExecutionState::Ready);

        exec.stop();
        exec.stop();
        assert_eq!(exec.done().await, Err(MainError::Canceled));
        assert_eq!(exec.state(), ExecutionState::Done);
        assert!(capture.is_empty());
    }

    #[tokio::test]
    async fn double_start_and_double_quit() {
        let capture = CaptureHooks::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let exec = exec(recording(seen, Ok(()), 0), &[], &capture);
        exec.start().unwrap();
        assert_eq!(exec.start(), Err(HarnessError::AlreadyStarted));

        exec.ready().await;
        exec.quit_signal().await;
        exec.quit_signal().await;
        assert_eq!(exec.done().await, Ok(()));
        assert!(capture.is_empty());
    }

    #[tokio::test]
    async fn expect_after_start_reports_error() {
        let capture = CaptureHooks::new();
        let exec = exec(returning(Ok(())), &[], &capture);
        exec.start().unwrap();
        exec.expect_iters(3);

        let errors = capture.error_calls();
        assert_eq!(errors.len(), 1);
        assert!(errors[0][0].starts_with(EXPECT_AFTER_START));
        assert_eq!(exec.done().await, Ok(()));
    }

    #[tokio::test]
    async fn panic_surfaces_through_done() {
        let capture = CaptureHooks::new();
        let main: MainRef = MainFn::arc(
            "panics",
            |ctx: MainContext, _args: Vec<String>, _logger: Logger| async move {
                if !ctx.is_cancelled() {
                    panic!("kaboom");
                }
                Ok(())
            },
        );
        let exec = exec(main, &[], &capture);
        exec.start().unwrap();
        exec.ready().await;

        let res = exec.done().await;
        assert_eq!(res, Err(MainError::Panicked { info: "kaboom".into() }));
        assert_eq!(exec.try_done(), Some(res));
    }

    #[tokio::test]
    async fn publishes_lifecycle_events() {
        let capture = CaptureHooks::new();
        let main: MainRef = MainFn::arc(
            "graceful",
            |mut ctx: MainContext, _args: Vec<String>, _logger: Logger| async move {
                ctx.ready_fn().announce();
                ctx.iter_fn().announce();
                ctx.quit_signal().await;
                ctx.cancelled().await;
                Ok(())
            },
        );
        let exec = exec(main, &[], &capture);
        let mut rx = exec.subscribe();
        exec.expect_iters(1);
        exec.start().unwrap();
        exec.wait_iters().await;
        exec.quit_signal().await;
        assert_eq!(exec.state(), ExecutionState::QuitRequested);
        exec.stop();
        exec.done().await.unwrap();

        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            kinds.push(ev.kind);
        }
        assert_eq!(
            kinds,
            vec![
                EventKind::Started,
                EventKind::ReadyAnnounced,
                EventKind::IterationAnnounced,
                EventKind::QuitRequested,
                EventKind::QuitDelivered,
                EventKind::StopRequested,
                EventKind::Completed,
            ]
        );
    }

    #[tokio::test]
    async fn entry_point_logs_reach_logger() {
        let (logger, logs) = Logger::observed(&crate::HarnessConfig::default());
        let main: MainRef = MainFn::arc(
            "chatty",
            |_ctx: MainContext, _args: Vec<String>, logger: Logger| async move {
                logger.info("via handle");
                tracing::info!("via macro");
                Ok(())
            },
        );
        let exec = Execution::new(main, Vec::<String>::new(), logger);
        exec.start().unwrap();
        exec.done().await.unwrap();

        assert_eq!(logs.filter_message("via handle").len(), 1);
        assert_eq!(logs.filter_message("via macro").len(), 1);
    }
}
