//! # Run one entry point to completion.
//!
//! Executes a single run of a [`Main`](crate::Main), converting a panic into
//! [`MainError::Panicked`] so the caller always gets a terminal result.
//!
//! ## Event flow
//!
//! ```text
//! Success / error:
//!   main.spawn() → Ok(()) | Err(e)             → returned as-is
//!
//! Panic:
//!   main.spawn() → panic → publish Panicked    → Err(Panicked { info })
//! ```
//!
//! ## Rules
//! - The `spawn` call itself happens inside the guarded future, so a panicking
//!   closure body is caught too.
//! - `Completed` is **not** published here; the caller publishes it after it has
//!   stored the result.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use crate::{
    error::MainError,
    events::{Bus, Event, EventKind},
    logging::Logger,
    mains::{MainContext, MainRef},
};

/// Runs `main` once and returns its terminal result.
pub(crate) async fn run_once(
    main: &MainRef,
    ctx: MainContext,
    args: Vec<String>,
    logger: Logger,
    bus: &Bus,
) -> Result<(), MainError> {
    let run = async { main.spawn(ctx, args, logger).await };

    match AssertUnwindSafe(run).catch_unwind().await {
        Ok(res) => res,
        Err(panic_err) => {
            let info = panic_info(&*panic_err);
            tracing::error!(main = main.name(), info = %info, "main function panicked");
            bus.publish(Event::new(EventKind::Panicked).with_reason(info.clone()));
            Err(MainError::Panicked { info })
        }
    }
}

fn panic_info(any: &(dyn Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;
    use tokio_util::sync::CancellationToken;

    use crate::mains::MainFn;

    fn detached() -> MainContext {
        let (_tx, rx) = mpsc::channel(1);
        MainContext::detached(CancellationToken::new(), rx)
    }

    #[tokio::test]
    async fn passes_result_through() {
        let main: MainRef = MainFn::arc(
            "fails",
            |_ctx: MainContext, _args: Vec<String>, _logger: Logger| async {
                Err(MainError::fail("whoops"))
            },
        );
        let res = run_once(&main, detached(), vec![], Logger::current(), &Bus::new(4)).await;
        assert_eq!(res, Err(MainError::fail("whoops")));
    }

    #[tokio::test]
    async fn converts_panic() {
        let bus = Bus::new(4);
        let mut rx = bus.subscribe();
        let main: MainRef = MainFn::arc(
            "panics",
            |_ctx: MainContext, args: Vec<String>, _logger: Logger| async move {
                if args.is_empty() {
                    panic!("boom");
                }
                Ok(())
            },
        );

        let res = run_once(&main, detached(), vec![], Logger::current(), &bus).await;
        assert_eq!(res, Err(MainError::Panicked { info: "boom".into() }));
        assert_eq!(rx.recv().await.expect("event").kind, EventKind::Panicked);
    }
}
