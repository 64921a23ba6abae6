//! # Observable log sink.
//!
//! [`ObserverLayer`] is a `tracing_subscriber` layer that stores each event as a
//! [`LoggedEntry`] inside a shared [`ObservedLogs`].
//!
//! ## Rules
//! - The `message` field becomes [`LoggedEntry::message`]; other fields are
//!   rendered to strings in [`LoggedEntry::fields`].
//! - Entries are kept in emission order.
//! - Filters return copies; the sink is only drained by [`ObservedLogs::take_all`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::field::{Field, Visit};
use tracing::{Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

/// One recorded log event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedEntry {
    /// Event level.
    pub level: Level,
    /// Event target (usually the module path of the call site).
    pub target: String,
    /// Rendered `message` field (empty if the event had none).
    pub message: String,
    /// Remaining structured fields, rendered as text.
    pub fields: BTreeMap<String, String>,
}

/// Shared, queryable store of recorded log events.
///
/// Cloning shares the underlying storage.
#[derive(Debug, Clone, Default)]
pub struct ObservedLogs {
    entries: Arc<Mutex<Vec<LoggedEntry>>>,
}

impl ObservedLogs {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a layer feeding this sink.
    pub fn layer(&self) -> ObserverLayer {
        ObserverLayer { logs: self.clone() }
    }

    /// Returns all entries in emission order.
    pub fn all(&self) -> Vec<LoggedEntry> {
        self.lock().clone()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no event was recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns entries whose message equals `msg` exactly.
    pub fn filter_message(&self, msg: &str) -> Vec<LoggedEntry> {
        self.filter(|e| e.message == msg)
    }

    /// Returns entries whose message contains `needle`.
    pub fn filter_message_contains(&self, needle: &str) -> Vec<LoggedEntry> {
        self.filter(|e| e.message.contains(needle))
    }

    /// Returns entries at exactly `level`.
    pub fn filter_level(&self, level: Level) -> Vec<LoggedEntry> {
        self.filter(|e| e.level == level)
    }

    /// Returns entries carrying field `key` rendered as `value`.
    pub fn filter_field(&self, key: &str, value: &str) -> Vec<LoggedEntry> {
        self.filter(|e| e.fields.get(key).is_some_and(|v| v == value))
    }

    /// Removes and returns all entries.
    pub fn take_all(&self) -> Vec<LoggedEntry> {
        std::mem::take(&mut *self.lock())
    }

    fn filter(&self, pred: impl Fn(&LoggedEntry) -> bool) -> Vec<LoggedEntry> {
        self.lock().iter().filter(|e| pred(e)).cloned().collect()
    }

    fn push(&self, entry: LoggedEntry) {
        self.lock().push(entry);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LoggedEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Layer recording events into an [`ObservedLogs`].
#[derive(Debug, Clone)]
pub struct ObserverLayer {
    logs: ObservedLogs,
}

impl<S: Subscriber> Layer<S> for ObserverLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let mut visitor = EntryVisitor::default();
        event.record(&mut visitor);

        self.logs.push(LoggedEntry {
            level: *meta.level(),
            target: meta.target().to_string(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

#[derive(Default)]
struct EntryVisitor {
    message: String,
    fields: BTreeMap<String, String>,
}

impl Visit for EntryVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.store(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.store(field, format!("{value:?}"));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.store(field, value.to_string());
    }
}

impl EntryVisitor {
    fn store(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = value;
        } else {
            self.fields.insert(field.name().to_string(), value);
        }
    }
}
