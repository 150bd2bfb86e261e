//! logtree core library
//!
//! A logging façade that routes every log call to exactly one of two sinks:
//! a local debug sink or a remote crash-reporting sink. The host's
//! [`ApplicationProvider`] decides which one at initialization time and
//! supplies the severities the remote sink should drop.
//!
//! ## Overview
//!
//! ```text
//! caller ──► LogDispatcher ──► DebugSink  ──► LocalDebugCapability (tracing)
//!                          └─► RemoteSink ──► ignored-level filter
//!                                          ──► priority / tag / message
//!                                          ──► RemoteReporter::report_error
//! ```
//!
//! Logging never fails: before `initialize`, after `dispose`, with unknown
//! priorities or unsupported context values, calls quietly do nothing.
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use logtree_core::{
//!     ApplicationProvider, LogDispatcher, MemoryReporter, SeverityLevel, StaticProvider,
//! };
//!
//! let reporter = Arc::new(MemoryReporter::new());
//! let dispatcher = LogDispatcher::with_reporter(reporter.clone());
//!
//! let provider = Arc::new(StaticProvider::new(false));
//! dispatcher.initialize(&provider);
//!
//! dispatcher.info("dropped: info is ignored by default");
//! dispatcher.error("upload failed");
//!
//! assert_eq!(reporter.report_count(), 1);
//! assert!(!provider.ignored_log_levels().contains(SeverityLevel::Error));
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod level;
pub mod local;
pub mod macros;
pub mod provider;
pub mod remote;
pub mod sink;

// Re-exports
pub use config::ProviderConfig;
pub use dispatcher::{DispatcherStateKind, LogDispatcher, TaggedLogger};
pub use error::{LogTreeError, LogTreeResult};
pub use event::{LogEvent, LoggedError, Throwable};
pub use level::{
    default_ignored_levels, resolve_ignored_level_names, resolve_ignored_levels, IgnoredLevelSet,
    SeverityLevel,
};
pub use local::{LocalDebugCapability, TracingOutput};
pub use provider::{ApplicationProvider, StaticProvider};
pub use remote::{ContextValue, MemoryReporter, RemoteCall, RemoteReporter};
pub use sink::{Sink, SinkKind};
