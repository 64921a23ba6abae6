//! # Running an entry point outside the harness.
//!
//! [`run_main`] drives a [`Main`](crate::Main) as a real program would: the
//! context's announcers are no-ops, and the first termination signal both
//! delivers the quit signal and cancels the token.
//!
//! ## Shutdown path
//! ```text
//! select! {
//!   main returns           ─► result
//!   shutdown trigger fires ─► quit_signal delivered
//!                          ─► token.cancel()
//!                          ─► await main ─► result
//! }
//! ```
//!
//! ## Example
//! ```no_run
//! use mainvisor::{Logger, MainContext, MainError, MainFn, MainRef, HarnessConfig, run_main};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), MainError> {
//!     let server: MainRef = MainFn::arc("server", |mut ctx: MainContext, _args: Vec<String>, logger: Logger| async move {
//!         logger.info("serving");
//!         ctx.quit_signal().await;
//!         Ok(())
//!     });
//!     let logger = Logger::new(&HarnessConfig::default());
//!     run_main(server, std::env::args().collect(), logger).await
//! }
//! ```

use std::future::Future;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::instrument::WithSubscriber;

use super::runner::run_once;
use super::shutdown;
use crate::{
    error::MainError,
    events::Bus,
    logging::Logger,
    mains::{MainContext, MainRef},
};

/// Runs `main` with `args` (full argument vector) until it returns.
///
/// SIGINT/SIGTERM/SIGQUIT (Ctrl-C on Windows) request shutdown. If signal handlers
/// cannot be installed, the entry point simply runs to completion.
pub async fn run_main(main: MainRef, args: Vec<String>, logger: Logger) -> Result<(), MainError> {
    let signal = async {
        if let Err(e) = shutdown::wait_for_shutdown_signal().await {
            tracing::warn!(error = %e, "cannot install shutdown signal handlers");
            std::future::pending::<()>().await;
        }
    };
    run_main_with_shutdown(main, args, logger, signal).await
}

/// Like [`run_main`], with `shutdown` as the trigger instead of OS signals.
pub async fn run_main_with_shutdown<F>(
    main: MainRef,
    args: Vec<String>,
    logger: Logger,
    shutdown: F,
) -> Result<(), MainError>
where
    F: Future<Output = ()>,
{
    let token = CancellationToken::new();
    let (quit_tx, quit_rx) = mpsc::channel(1);
    let ctx = MainContext::detached(token.clone(), quit_rx);
    let bus = Bus::new(1);

    let run = run_once(&main, ctx, args, logger.clone(), &bus)
        .with_subscriber(logger.dispatch().clone());
    tokio::pin!(run);

    tokio::select! {
        res = &mut run => res,
        _ = shutdown => {
            logger.info("shutdown requested");
            let (ack, _ack_rx) = oneshot::channel();
            let _ = quit_tx.try_send(ack);
            token.cancel();
            run.await
        }
    }
}
