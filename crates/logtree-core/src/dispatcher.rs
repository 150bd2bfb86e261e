//! The log dispatcher: owns the active sink and exposes the logging API.
//!
//! ## State machine
//!
//! ```text
//!                initialize(debug)          initialize(*) = no-op
//!   Uninitialized ───────────────► DebugActive ◄──┐
//!        ▲   │                        │   └───────┘
//!        │   │ initialize(!debug)     │
//!        │   └──────────────► RemoteActive ◄──┐
//!        │                        │   └───────┘
//!        └──────── dispose ───────┴──────────── (from any state)
//! ```
//!
//! Switching backends always takes a `dispose` followed by a new
//! `initialize`; there is no direct DebugActive ↔ RemoteActive edge.
//!
//! ## Concurrency
//!
//! `initialize` and `dispose` take the write half of a single lock. Log calls
//! take the read half just long enough to clone the active sink and then
//! forward outside the lock, so a log racing with `dispose` either reaches the
//! outgoing sink or is dropped.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::event::{LogEvent, Throwable};
use crate::level::{default_ignored_levels, IgnoredLevelSet, SeverityLevel};
use crate::local::{LocalDebugCapability, TracingOutput};
use crate::provider::ApplicationProvider;
use crate::remote::{ContextValue, RemoteReporter};
use crate::sink::{DebugSink, RemoteSink, Sink, SinkKind};

/// Externally visible dispatcher state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatcherStateKind {
    Uninitialized,
    DebugActive,
    RemoteActive,
}

#[derive(Default)]
struct DispatcherState {
    sink: Option<Arc<Sink>>,
    provider: Option<Weak<dyn ApplicationProvider>>,
}

/// Routes log calls to a debug or remote sink chosen from the provider.
///
/// Owned by the host's composition root and shared with call sites through
/// `Arc`. Every public method is total: nothing here panics or returns an
/// error to the caller.
pub struct LogDispatcher {
    local: Arc<dyn LocalDebugCapability>,
    reporter: Arc<dyn RemoteReporter>,
    state: RwLock<DispatcherState>,
}

/// Per-level shortcuts shared by [`LogDispatcher`] and [`TaggedLogger`].
///
/// Each expands to a plain message variant, a throwable-only variant and a
/// throwable-plus-message variant, all routed through `self.submit`.
macro_rules! level_shortcuts {
    ($($level:ident => $msg:ident, $err:ident, $with:ident;)*) => {
        $(
            #[doc = concat!("Log a message at `", stringify!($level), "`.")]
            pub fn $msg(&self, message: impl fmt::Display) {
                self.submit(SeverityLevel::$level, None, Some(message));
            }

            #[doc = concat!("Log an error at `", stringify!($level), "`.")]
            pub fn $err(&self, throwable: Throwable) {
                self.submit::<&str>(SeverityLevel::$level, Some(throwable), None);
            }

            #[doc = concat!("Log an error with a message at `", stringify!($level), "`.")]
            pub fn $with(&self, throwable: Throwable, message: impl fmt::Display) {
                self.submit(SeverityLevel::$level, Some(throwable), Some(message));
            }
        )*

        /// Log a message at an explicit severity.
        pub fn log(&self, severity: SeverityLevel, message: impl fmt::Display) {
            self.submit(severity, None, Some(message));
        }

        /// Log an error at an explicit severity.
        pub fn log_err(&self, severity: SeverityLevel, throwable: Throwable) {
            self.submit::<&str>(severity, Some(throwable), None);
        }

        /// Log an error with a message at an explicit severity.
        pub fn log_with(
            &self,
            severity: SeverityLevel,
            throwable: Throwable,
            message: impl fmt::Display,
        ) {
            self.submit(severity, Some(throwable), Some(message));
        }

        /// Log at a raw numeric priority. Priorities outside `2..=7` are
        /// dropped.
        pub fn log_priority(&self, priority: i32, message: impl fmt::Display) {
            if let Ok(severity) = SeverityLevel::from_priority(priority) {
                self.submit(severity, None, Some(message));
            }
        }
    };
}

impl LogDispatcher {
    /// Create an uninitialized dispatcher over the two capabilities.
    pub fn new(local: Arc<dyn LocalDebugCapability>, reporter: Arc<dyn RemoteReporter>) -> Self {
        Self {
            local,
            reporter,
            state: RwLock::new(DispatcherState::default()),
        }
    }

    /// Create a dispatcher whose debug sink writes through `tracing`.
    pub fn with_reporter(reporter: Arc<dyn RemoteReporter>) -> Self {
        Self::new(Arc::new(TracingOutput), reporter)
    }

    /// Install a sink chosen by `provider.is_debug()`.
    ///
    /// The first call wins: while initialized, further calls are ignored even
    /// if they pass a different provider. Only a weak reference to the
    /// provider is kept.
    pub fn initialize<P>(&self, provider: &Arc<P>)
    where
        P: ApplicationProvider + 'static,
    {
        let provider: Arc<dyn ApplicationProvider> = provider.clone();
        self.initialize_shared(&provider);
    }

    /// [`initialize`](Self::initialize) for providers already behind a trait
    /// object.
    pub fn initialize_shared(&self, provider: &Arc<dyn ApplicationProvider>) {
        // Asked before locking so a provider that logs cannot deadlock us.
        let debug = provider.is_debug();

        let mut state = self.state.write();
        if state.provider.is_some() {
            drop(state);
            tracing::debug!("log dispatcher already initialized, ignoring");
            return;
        }

        let weak = Arc::downgrade(provider);
        let sink = if debug {
            Sink::Debug(DebugSink::new(Arc::clone(&self.local)))
        } else {
            Sink::Remote(RemoteSink::new(Arc::clone(&self.reporter), weak.clone()))
        };
        let kind = sink.kind();

        // Replacing the slot uproots whatever sink was there.
        state.sink = Some(Arc::new(sink));
        state.provider = Some(weak);
        drop(state);
        tracing::debug!(sink = ?kind, "log dispatcher initialized");
    }

    /// Drop the provider and sink, returning to the uninitialized state.
    pub fn dispose(&self) {
        let mut state = self.state.write();
        let previous = state.sink.take().map(|sink| sink.kind());
        state.provider = None;
        drop(state);
        tracing::debug!(previous = ?previous, "log dispatcher disposed");
    }

    pub fn is_initialized(&self) -> bool {
        self.state.read().provider.is_some()
    }

    pub fn sink_kind(&self) -> SinkKind {
        self.state
            .read()
            .sink
            .as_ref()
            .map_or(SinkKind::None, |sink| sink.kind())
    }

    pub fn state(&self) -> DispatcherStateKind {
        match self.sink_kind() {
            SinkKind::None => DispatcherStateKind::Uninitialized,
            SinkKind::Debug => DispatcherStateKind::DebugActive,
            SinkKind::Remote => DispatcherStateKind::RemoteActive,
        }
    }

    pub fn has_debug_sink(&self) -> bool {
        self.sink_kind() == SinkKind::Debug
    }

    pub fn has_remote_sink(&self) -> bool {
        self.sink_kind() == SinkKind::Remote
    }

    /// The provider passed to `initialize`, if the host still holds it.
    pub fn provider(&self) -> Option<Arc<dyn ApplicationProvider>> {
        self.state.read().provider.as_ref().and_then(Weak::upgrade)
    }

    /// Ignored levels the remote sink applies right now: the provider's set,
    /// or the default policy when uninitialized or the provider is gone.
    pub fn ignored_log_levels(&self) -> IgnoredLevelSet {
        self.provider()
            .map(|provider| provider.ignored_log_levels())
            .unwrap_or_else(default_ignored_levels)
    }

    /// The remote capability this dispatcher reports to.
    pub fn reporter(&self) -> &Arc<dyn RemoteReporter> {
        &self.reporter
    }

    /// Borrow a logger that tags every event with `tag`.
    pub fn tag(&self, tag: impl Into<String>) -> TaggedLogger<'_> {
        TaggedLogger {
            dispatcher: self,
            tag: tag.into(),
        }
    }

    /// Forward a prebuilt event to the active sink.
    pub fn log_event(&self, event: LogEvent) {
        if let Some(sink) = self.active_sink() {
            sink.log(&event);
        }
    }

    level_shortcuts! {
        Verbose => verbose, verbose_err, verbose_with;
        Debug => debug, debug_err, debug_with;
        Info => info, info_err, info_with;
        Warn => warn, warn_err, warn_with;
        Error => error, error_err, error_with;
        Assert => assert, assert_err, assert_with;
    }

    pub fn set_user_identifier(&self, identifier: &str) {
        if let Some(reporter) = self.passthrough("user_identifier", &identifier) {
            reporter.set_user_identifier(identifier);
        }
    }

    pub fn set_user_email(&self, email: &str) {
        if let Some(reporter) = self.passthrough("user_email", &email) {
            reporter.set_user_email(email);
        }
    }

    pub fn set_user_name(&self, name: &str) {
        if let Some(reporter) = self.passthrough("user_name", &name) {
            reporter.set_user_name(name);
        }
    }

    /// Attach a user property. Same as [`set`](Self::set).
    pub fn set_user_property(&self, key: &str, value: impl Into<ContextValue>) {
        self.set(key, value);
    }

    /// Attach a typed context value. Empty keys are ignored.
    pub fn set(&self, key: &str, value: impl Into<ContextValue>) {
        if key.is_empty() {
            return;
        }
        let value = value.into();
        if let Some(reporter) = self.passthrough(key, &value) {
            value.apply(reporter.as_ref(), key);
        }
    }

    /// Attach a runtime-typed context value.
    ///
    /// Values that are not `bool`, `f64`, `f32`, `i32`, `i64`, `String` or
    /// `&str` are dropped.
    pub fn set_any(&self, key: &str, value: &dyn Any) {
        if let Some(value) = ContextValue::from_any(value) {
            self.set(key, value);
        }
    }

    fn active_sink(&self) -> Option<Arc<Sink>> {
        self.state.read().sink.clone()
    }

    fn submit<M: fmt::Display>(
        &self,
        severity: SeverityLevel,
        throwable: Option<Throwable>,
        message: Option<M>,
    ) {
        self.dispatch(severity, None, throwable, message);
    }

    fn dispatch<M: fmt::Display>(
        &self,
        severity: SeverityLevel,
        tag: Option<&str>,
        throwable: Option<Throwable>,
        message: Option<M>,
    ) {
        // Rendering waits until we know someone will receive the event.
        let Some(sink) = self.active_sink() else {
            return;
        };
        let message = match (message, &throwable) {
            (Some(message), _) => message.to_string(),
            (None, Some(throwable)) => throwable.to_string(),
            (None, None) => String::new(),
        };
        sink.log(&LogEvent {
            severity,
            tag: tag.map(String::from),
            message,
            throwable,
        });
    }

    /// Route a context/user update: the remote reporter when the remote sink
    /// is active, local output when the debug sink is, nowhere otherwise.
    fn passthrough(&self, key: &str, value: &dyn fmt::Display) -> Option<Arc<dyn RemoteReporter>> {
        match self.sink_kind() {
            SinkKind::Remote => Some(Arc::clone(&self.reporter)),
            SinkKind::Debug => {
                self.local.emit(
                    SeverityLevel::Debug,
                    Some("context"),
                    &format!("{} = {}", key, value),
                    None,
                );
                None
            }
            SinkKind::None => None,
        }
    }
}

impl fmt::Debug for LogDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogDispatcher")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// Logger borrowed from a [`LogDispatcher`] that tags every event.
pub struct TaggedLogger<'a> {
    dispatcher: &'a LogDispatcher,
    tag: String,
}

impl TaggedLogger<'_> {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    level_shortcuts! {
        Verbose => verbose, verbose_err, verbose_with;
        Debug => debug, debug_err, debug_with;
        Info => info, info_err, info_with;
        Warn => warn, warn_err, warn_with;
        Error => error, error_err, error_with;
        Assert => assert, assert_err, assert_with;
    }

    fn submit<M: fmt::Display>(
        &self,
        severity: SeverityLevel,
        throwable: Option<Throwable>,
        message: Option<M>,
    ) {
        self.dispatcher
            .dispatch(severity, Some(self.tag.as_str()), throwable, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::StaticProvider;
    use crate::remote::{MemoryReporter, RemoteCall};

    fn remote_dispatcher() -> (LogDispatcher, Arc<MemoryReporter>) {
        let reporter = Arc::new(MemoryReporter::new());
        (LogDispatcher::with_reporter(reporter.clone()), reporter)
    }

    #[test]
    fn test_starts_uninitialized() {
        let (dispatcher, _) = remote_dispatcher();
        assert_eq!(dispatcher.state(), DispatcherStateKind::Uninitialized);
        assert_eq!(dispatcher.sink_kind(), SinkKind::None);
        assert!(!dispatcher.is_initialized());
        assert!(dispatcher.provider().is_none());
    }

    #[test]
    fn test_initialize_debug() {
        let (dispatcher, _) = remote_dispatcher();
        let provider = Arc::new(StaticProvider::new(true));
        dispatcher.initialize(&provider);

        assert!(dispatcher.is_initialized());
        assert!(dispatcher.has_debug_sink());
        assert!(!dispatcher.has_remote_sink());
        assert!(dispatcher.provider().map(|p| p.is_debug()).unwrap_or(false));
    }

    #[test]
    fn test_initialize_remote() {
        let (dispatcher, _) = remote_dispatcher();
        let provider = Arc::new(StaticProvider::new(false));
        dispatcher.initialize(&provider);

        assert_eq!(dispatcher.state(), DispatcherStateKind::RemoteActive);
        assert!(!dispatcher.has_debug_sink());
        assert!(dispatcher.provider().is_some());
    }

    #[test]
    fn test_dispose_resets() {
        let (dispatcher, _) = remote_dispatcher();
        let provider = Arc::new(StaticProvider::new(false));
        dispatcher.initialize(&provider);
        dispatcher.dispose();

        assert_eq!(dispatcher.state(), DispatcherStateKind::Uninitialized);
        assert!(dispatcher.provider().is_none());

        // Disposing twice is fine.
        dispatcher.dispose();
        assert!(!dispatcher.is_initialized());
    }

    #[test]
    fn test_shortcut_renders_throwable_as_message() {
        let (dispatcher, reporter) = remote_dispatcher();
        let provider = Arc::new(StaticProvider::new(false));
        dispatcher.initialize(&provider);

        dispatcher.error_err(Arc::new(crate::event::LoggedError::new("socket closed")));

        assert_eq!(
            reporter.calls(),
            vec![
                RemoteCall::SetInt("priority".into(), 6),
                RemoteCall::SetString("tag".into(), "".into()),
                RemoteCall::SetString("message".into(), "socket closed".into()),
                RemoteCall::Report("socket closed".into()),
            ]
        );
    }

    #[test]
    fn test_log_priority_drops_unknown_priorities() {
        let (dispatcher, reporter) = remote_dispatcher();
        let provider = Arc::new(StaticProvider::new(false));
        dispatcher.initialize(&provider);

        dispatcher.log_priority(42, "nowhere");
        dispatcher.log_priority(6, "somewhere");
        assert_eq!(reporter.report_count(), 1);
    }

    #[test]
    fn test_tagged_logger() {
        let (dispatcher, reporter) = remote_dispatcher();
        let provider = Arc::new(StaticProvider::new(false));
        dispatcher.initialize(&provider);

        let net = dispatcher.tag("net");
        assert_eq!(net.tag(), "net");
        net.warn(format_args!("retry {} of {}", 1, 3));

        assert_eq!(
            reporter.context_value("tag"),
            Some(ContextValue::String("net".into()))
        );
        assert_eq!(
            reporter.context_value("message"),
            Some(ContextValue::String("retry 1 of 3".into()))
        );
    }

    #[test]
    fn test_ignored_log_levels_follow_provider() {
        let (dispatcher, _) = remote_dispatcher();
        assert_eq!(dispatcher.ignored_log_levels(), default_ignored_levels());

        let provider = Arc::new(StaticProvider::new(false).with_ignored_levels(
            crate::level::resolve_ignored_levels(&[SeverityLevel::Warn]),
        ));
        dispatcher.initialize(&provider);
        assert!(dispatcher.ignored_log_levels().contains(SeverityLevel::Warn));
        assert!(!dispatcher.ignored_log_levels().contains(SeverityLevel::Info));

        drop(provider);
        assert!(dispatcher.is_initialized());
        assert_eq!(dispatcher.ignored_log_levels(), default_ignored_levels());
    }

    #[test]
    fn test_debug_impl() {
        let (dispatcher, _) = remote_dispatcher();
        assert!(format!("{:?}", dispatcher).contains("Uninitialized"));
    }
}
