//! Sink for release builds: filters, enriches and reports remotely.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::event::LogEvent;
use crate::level::{default_ignored_levels, IgnoredLevelSet};
use crate::provider::ApplicationProvider;
use crate::remote::RemoteReporter;

/// Context key holding the numeric priority of the reported event
pub const KEY_PRIORITY: &str = "priority";
/// Context key holding the event tag (empty when the event has none)
pub const KEY_TAG: &str = "tag";
/// Context key holding the event message
pub const KEY_MESSAGE: &str = "message";

/// Drops ignored severities and reports everything else to a
/// [`RemoteReporter`].
///
/// The metadata keys and the report that follows them are written under one
/// lock, so a report always carries its own event's priority, tag and message.
#[derive(Clone)]
pub struct RemoteSink {
    reporter: Arc<dyn RemoteReporter>,
    provider: Weak<dyn ApplicationProvider>,
    report_lock: Arc<Mutex<()>>,
}

impl RemoteSink {
    pub fn new(reporter: Arc<dyn RemoteReporter>, provider: Weak<dyn ApplicationProvider>) -> Self {
        Self {
            reporter,
            provider,
            report_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Ignored levels as of right now.
    ///
    /// Asked of the provider on every event. A provider the host has already
    /// dropped yields the default policy.
    pub fn ignored_levels(&self) -> IgnoredLevelSet {
        self.provider
            .upgrade()
            .map(|provider| provider.ignored_log_levels())
            .unwrap_or_else(default_ignored_levels)
    }

    pub fn log(&self, event: &LogEvent) {
        if self.ignored_levels().contains(event.severity) {
            return;
        }

        let error = event.reportable_error();
        let reporter = self.reporter.as_ref();
        let _guard = self.report_lock.lock();
        reporter.set_int(KEY_PRIORITY, event.severity.priority());
        reporter.set_string(KEY_TAG, event.tag.as_deref().unwrap_or(""));
        reporter.set_string(KEY_MESSAGE, &event.message);
        reporter.report_error(error);
    }
}
