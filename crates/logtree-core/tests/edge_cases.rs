//! Edge case and boundary condition tests
//!
//! Logging must never fail the caller: these tests cover calls before
//! initialization, after disposal, malformed input and concurrent use.

mod common;

use std::sync::Arc;
use std::thread;

use common::{dispatcher, provider};
use logtree_core::{
    default_ignored_levels, resolve_ignored_level_names, ApplicationProvider, LogDispatcher,
    LogEvent, LoggedError, MemoryReporter, ProviderConfig, SeverityLevel, SinkKind,
    StaticProvider,
};

// ============================================================================
// Uninitialized Dispatcher
// ============================================================================

/// Every entry point is a silent no-op before initialize
#[test]
fn test_calls_before_initialize_are_noops() {
    let (dispatcher, reporter) = dispatcher();

    dispatcher.warn("x");
    dispatcher.error("x");
    dispatcher.assert_err(Arc::new(LoggedError::new("x")));
    dispatcher.log(SeverityLevel::Error, "x");
    dispatcher.log_priority(7, "x");
    dispatcher.log_event(LogEvent::new(SeverityLevel::Assert, "x"));
    dispatcher.tag("t").error("x");
    dispatcher.set_user_identifier("id");
    dispatcher.set("k", 1i32);
    dispatcher.set_any("k", &true);

    assert!(reporter.calls().is_empty());
    assert_eq!(dispatcher.sink_kind(), SinkKind::None);
}

/// Calls after dispose are dropped again
#[test]
fn test_calls_after_dispose_are_noops() {
    let (dispatcher, reporter) = dispatcher();
    let remote = provider(false);
    dispatcher.initialize(&remote);
    dispatcher.error("before");
    dispatcher.dispose();
    dispatcher.error("after");

    assert_eq!(reporter.report_count(), 1);
}

/// Formatting arguments are not rendered when nothing would receive them
#[test]
fn test_arguments_not_rendered_without_sink() {
    struct Explosive;

    impl std::fmt::Display for Explosive {
        fn fmt(&self, _f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            panic!("rendered without a sink");
        }
    }

    let (dispatcher, _) = dispatcher();
    dispatcher.error(Explosive);
    dispatcher.tag("t").warn(format_args!("{}", Explosive));
}

// ============================================================================
// Message Edge Cases
// ============================================================================

#[test]
fn test_empty_and_unicode_messages() {
    let (dispatcher, reporter) = dispatcher();
    let remote = provider(false);
    dispatcher.initialize(&remote);

    dispatcher.error("");
    dispatcher.error("日本語 🚀 \n\t");

    let reports = reporter.reports();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].error.to_string(), "");
    assert_eq!(reports[1].error.to_string(), "日本語 🚀 \n\t");
}

#[test]
fn test_throwable_only_event_uses_error_description() {
    let (dispatcher, reporter) = dispatcher();
    let remote = provider(false);
    dispatcher.initialize(&remote);

    dispatcher.log_err(SeverityLevel::Warn, Arc::new(LoggedError::new("quota")));

    let reports = reporter.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(
        reports[0].context_value("message"),
        Some(&logtree_core::ContextValue::String("quota".into()))
    );
}

#[test]
fn test_invalid_priorities_are_dropped() {
    let (dispatcher, reporter) = dispatcher();
    let remote = provider(false);
    dispatcher.initialize(&remote);

    for priority in [i32::MIN, -1, 0, 1, 8, i32::MAX] {
        dispatcher.log_priority(priority, "nope");
    }
    assert!(reporter.calls().is_empty());
}

// ============================================================================
// Configuration Fallbacks
// ============================================================================

#[test]
fn test_malformed_level_names_fall_back() {
    assert_eq!(
        resolve_ignored_level_names(&["", "   "]),
        default_ignored_levels()
    );
    assert_eq!(
        resolve_ignored_level_names(&["info", "9"]),
        default_ignored_levels()
    );
}

#[test]
fn test_config_with_bad_levels_yields_default_policy() {
    let config =
        ProviderConfig::from_json(r#"{"debug": false, "ignored_levels": ["loudest"]}"#).unwrap();
    let remote = Arc::new(StaticProvider::from_config(&config));
    assert_eq!(remote.ignored_log_levels(), default_ignored_levels());
}

// ============================================================================
// Concurrency
// ============================================================================

/// Many threads logging while another thread cycles the lifecycle
#[test]
fn test_concurrent_logging_and_lifecycle() {
    let reporter = Arc::new(MemoryReporter::new());
    let dispatcher = Arc::new(LogDispatcher::with_reporter(reporter.clone()));
    let remote = provider(false);

    let loggers: Vec<_> = (0..8)
        .map(|i| {
            let dispatcher = Arc::clone(&dispatcher);
            thread::spawn(move || {
                for n in 0..200 {
                    dispatcher.tag(format!("worker-{}", i)).error(n);
                    dispatcher.verbose("never reported");
                }
            })
        })
        .collect();

    let cycler = {
        let dispatcher = Arc::clone(&dispatcher);
        let remote = Arc::clone(&remote);
        thread::spawn(move || {
            for _ in 0..200 {
                dispatcher.initialize(&remote);
                dispatcher.dispose();
            }
            dispatcher.initialize(&remote);
        })
    };

    for handle in loggers {
        handle.join().unwrap();
    }
    cycler.join().unwrap();

    assert_eq!(dispatcher.sink_kind(), SinkKind::Remote);
    assert!(reporter.report_count() <= 8 * 200);
    for report in reporter.reports() {
        assert_ne!(
            report.context_value("priority"),
            Some(&logtree_core::ContextValue::Int(SeverityLevel::Verbose.priority()))
        );
    }
}

/// Concurrent initializers: exactly one wins
#[test]
fn test_concurrent_initialize_first_writer_wins() {
    let (dispatcher, _) = dispatcher();
    let dispatcher = Arc::new(dispatcher);
    let providers: Vec<Arc<StaticProvider>> = (0..16).map(|i| provider(i % 2 == 0)).collect();

    let handles: Vec<_> = providers
        .iter()
        .cloned()
        .map(|p| {
            let dispatcher = Arc::clone(&dispatcher);
            thread::spawn(move || dispatcher.initialize(&p))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let winner = dispatcher.provider().expect("one provider installed");
    let expected = if winner.is_debug() {
        SinkKind::Debug
    } else {
        SinkKind::Remote
    };
    assert_eq!(dispatcher.sink_kind(), expected);
}

/// Logging from async tasks on a multi-threaded runtime
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_logging_from_tokio_tasks() {
    let reporter = Arc::new(MemoryReporter::new());
    let dispatcher = Arc::new(LogDispatcher::with_reporter(reporter.clone()));
    let remote = provider(false);
    dispatcher.initialize(&remote);

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let dispatcher = Arc::clone(&dispatcher);
            tokio::spawn(async move {
                dispatcher.warn(format_args!("task {}", i));
                tokio::task::yield_now().await;
                dispatcher.info(format_args!("task {} done", i));
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(reporter.report_count(), 16);
}
