//! Log sinks: exactly one is active in a dispatcher at a time.
//!
//! ```text
//! LogEvent ──► Sink::Debug  ──► LocalDebugCapability   (unfiltered)
//!          └─► Sink::Remote ──► ignored-level filter
//!                              ──► priority / tag / message context
//!                              ──► RemoteReporter::report_error
//! ```

pub mod debug;
pub mod remote;

pub use debug::DebugSink;
pub use remote::{RemoteSink, KEY_MESSAGE, KEY_PRIORITY, KEY_TAG};

use crate::event::LogEvent;

/// Which sink a dispatcher currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkKind {
    None,
    Debug,
    Remote,
}

/// The active destination for log events.
pub enum Sink {
    Debug(DebugSink),
    Remote(RemoteSink),
}

impl Sink {
    pub fn kind(&self) -> SinkKind {
        match self {
            Self::Debug(_) => SinkKind::Debug,
            Self::Remote(_) => SinkKind::Remote,
        }
    }

    /// Hand one event to the underlying sink.
    pub fn log(&self, event: &LogEvent) {
        match self {
            Self::Debug(sink) => sink.log(event),
            Self::Remote(sink) => sink.log(event),
        }
    }
}

impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Sink").field(&self.kind()).finish()
    }
}
