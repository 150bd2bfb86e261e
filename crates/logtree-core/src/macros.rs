//! Call-site macros that format their arguments and tag the event with the
//! calling module.
//!
//! ```
//! use std::sync::Arc;
//! use logtree_core::{log_error, log_warn, LogDispatcher, LoggedError, MemoryReporter, StaticProvider};
//!
//! let reporter = Arc::new(MemoryReporter::new());
//! let dispatcher = LogDispatcher::with_reporter(reporter.clone());
//! let provider = Arc::new(StaticProvider::new(false));
//! dispatcher.initialize(&provider);
//!
//! let backoff = 250;
//! log_warn!(dispatcher, "retrying in {}ms", backoff);
//! log_error!(dispatcher, err = Arc::new(LoggedError::new("eof")), "upload failed for {}", "a.txt");
//!
//! let reports = reporter.reports();
//! assert_eq!(reports.len(), 2);
//! assert_eq!(reports[1].error.to_string(), "eof");
//! ```
//!
//! Arguments are only rendered when a sink is active.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_at {
    ($dispatcher:expr, $level:ident, err = $err:expr, $($arg:tt)+) => {
        $dispatcher
            .tag(::std::module_path!())
            .log_with($crate::SeverityLevel::$level, $err, ::std::format_args!($($arg)+))
    };
    ($dispatcher:expr, $level:ident, err = $err:expr) => {
        $dispatcher
            .tag(::std::module_path!())
            .log_err($crate::SeverityLevel::$level, $err)
    };
    ($dispatcher:expr, $level:ident, $($arg:tt)+) => {
        $dispatcher
            .tag(::std::module_path!())
            .log($crate::SeverityLevel::$level, ::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_verbose {
    ($dispatcher:expr, $($arg:tt)+) => { $crate::__log_at!($dispatcher, Verbose, $($arg)+) };
}

#[macro_export]
macro_rules! log_debug {
    ($dispatcher:expr, $($arg:tt)+) => { $crate::__log_at!($dispatcher, Debug, $($arg)+) };
}

#[macro_export]
macro_rules! log_info {
    ($dispatcher:expr, $($arg:tt)+) => { $crate::__log_at!($dispatcher, Info, $($arg)+) };
}

#[macro_export]
macro_rules! log_warn {
    ($dispatcher:expr, $($arg:tt)+) => { $crate::__log_at!($dispatcher, Warn, $($arg)+) };
}

#[macro_export]
macro_rules! log_error {
    ($dispatcher:expr, $($arg:tt)+) => { $crate::__log_at!($dispatcher, Error, $($arg)+) };
}

#[macro_export]
macro_rules! log_assert {
    ($dispatcher:expr, $($arg:tt)+) => { $crate::__log_at!($dispatcher, Assert, $($arg)+) };
}
