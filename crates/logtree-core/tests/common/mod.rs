//! Shared fixtures for logtree integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fmt::Write as FmtWrite;
use std::sync::Arc;

use logtree_core::{ApplicationProvider, LogDispatcher, MemoryReporter, StaticProvider};
use parking_lot::Mutex;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

/// One event seen by [`CaptureLayer`].
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: tracing::Level,
    pub target: String,
    pub message: String,
    pub fields: BTreeMap<String, String>,
}

/// Layer that records every event it sees.
#[derive(Clone, Default)]
pub struct CaptureLayer {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CaptureLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().clone()
    }

    /// Events emitted by `TracingOutput`, ignoring dispatcher diagnostics.
    pub fn output_events(&self) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.target == logtree_core::local::TRACING_TARGET)
            .collect()
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        self.events.lock().push(CapturedEvent {
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: visitor.message.unwrap_or_default(),
            fields: visitor.fields,
        });
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: BTreeMap<String, String>,
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let mut buf = String::new();
        let _ = write!(&mut buf, "{:?}", value);
        if field.name() == "message" {
            self.message = Some(buf);
        } else {
            self.fields.insert(field.name().to_string(), buf);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields
                .insert(field.name().to_string(), value.to_string());
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields
            .insert(field.name().to_string(), value.to_string());
    }
}

/// Provider that reports a fixed debug flag with the default policy.
pub fn provider(debug: bool) -> Arc<StaticProvider> {
    Arc::new(StaticProvider::new(debug))
}

/// A fresh dispatcher over an in-memory reporter.
pub fn dispatcher() -> (LogDispatcher, Arc<MemoryReporter>) {
    let reporter = Arc::new(MemoryReporter::new());
    (LogDispatcher::with_reporter(reporter.clone()), reporter)
}

/// Whether the dispatcher currently points at this exact provider.
pub fn holds_provider<P: ApplicationProvider + 'static>(
    dispatcher: &LogDispatcher,
    provider: &Arc<P>,
) -> bool {
    dispatcher
        .provider()
        .map(|held| Arc::as_ptr(&held) as *const () == Arc::as_ptr(provider) as *const ())
        .unwrap_or(false)
}
