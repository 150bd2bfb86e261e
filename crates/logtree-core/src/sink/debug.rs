//! Sink for debug builds: every event goes to local output.

use std::sync::Arc;

use crate::event::LogEvent;
use crate::local::LocalDebugCapability;

/// Forwards every event verbatim to a [`LocalDebugCapability`].
///
/// No severity filtering happens here; the ignored-level policy only applies
/// to the remote sink.
#[derive(Clone)]
pub struct DebugSink {
    output: Arc<dyn LocalDebugCapability>,
}

impl DebugSink {
    pub fn new(output: Arc<dyn LocalDebugCapability>) -> Self {
        Self { output }
    }

    pub fn log(&self, event: &LogEvent) {
        self.output.emit(
            event.severity,
            event.tag.as_deref(),
            &event.message,
            event.throwable.as_ref(),
        );
    }
}
