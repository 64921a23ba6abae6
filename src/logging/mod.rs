//! # Loggers handed to entry points.
//!
//! Entry points receive a [`Logger`]: a cloneable handle to a `tracing` dispatcher.
//! The controller polls the entry point with that dispatcher as the default, so
//! both `logger.info(..)` and plain `tracing::info!(..)` land in the same sink.
//!
//! For assertions, [`Logger::observed`] attaches an [`ObservedLogs`] sink that
//! records every event and can be filtered after the fact.
//!
//! ```text
//! Registry
//!   ├─ EnvFilter   (HarnessConfig::log_filter)
//!   ├─ ObserverLayer ──► ObservedLogs (Arc<Mutex<Vec<LoggedEntry>>>)
//!   └─ fmt layer   (test writer, when HarnessConfig::echo_logs)
//! ```

mod logger;
mod observer;

pub use logger::Logger;
pub use observer::{LoggedEntry, ObservedLogs, ObserverLayer};
