//! In-memory [`RemoteReporter`] that records every call.
//!
//! Stands in for a real crash-reporting backend in the sample binary and in
//! tests.

use parking_lot::Mutex;

use super::{ContextValue, RemoteReporter};
use crate::event::Throwable;

/// One recorded reporter call.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCall {
    /// `report_error`, holding the error's description
    Report(String),
    SetBool(String, bool),
    SetDouble(String, f64),
    SetFloat(String, f32),
    SetInt(String, i32),
    SetLong(String, i64),
    SetString(String, String),
    UserIdentifier(String),
    UserEmail(String),
    UserName(String),
}

/// A report together with the context keys that were current when it was
/// made.
#[derive(Debug, Clone)]
pub struct RecordedReport {
    pub error: Throwable,
    pub context: Vec<(String, ContextValue)>,
}

impl RecordedReport {
    /// Latest value recorded for `key` at report time.
    pub fn context_value(&self, key: &str) -> Option<&ContextValue> {
        self.context
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

#[derive(Default)]
struct Inner {
    calls: Vec<RemoteCall>,
    context: Vec<(String, ContextValue)>,
    reports: Vec<RecordedReport>,
}

impl Inner {
    fn set(&mut self, key: &str, value: ContextValue, call: RemoteCall) {
        self.context.retain(|(k, _)| k != key);
        self.context.push((key.to_string(), value));
        self.calls.push(call);
    }
}

/// Reporter that keeps calls, current context and reports in memory.
#[derive(Default)]
pub struct MemoryReporter {
    inner: Mutex<Inner>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call in order.
    pub fn calls(&self) -> Vec<RemoteCall> {
        self.inner.lock().calls.clone()
    }

    /// Every `report_error` call with its context snapshot.
    pub fn reports(&self) -> Vec<RecordedReport> {
        self.inner.lock().reports.clone()
    }

    pub fn report_count(&self) -> usize {
        self.inner.lock().reports.len()
    }

    /// Current value of a context key.
    pub fn context_value(&self, key: &str) -> Option<ContextValue> {
        self.inner
            .lock()
            .context
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.calls.clear();
        inner.context.clear();
        inner.reports.clear();
    }
}

impl RemoteReporter for MemoryReporter {
    fn report_error(&self, error: Throwable) {
        let mut inner = self.inner.lock();
        inner.calls.push(RemoteCall::Report(error.to_string()));
        let context = inner.context.clone();
        inner.reports.push(RecordedReport { error, context });
    }

    fn set_bool(&self, key: &str, value: bool) {
        self.inner
            .lock()
            .set(key, value.into(), RemoteCall::SetBool(key.into(), value));
    }

    fn set_double(&self, key: &str, value: f64) {
        self.inner
            .lock()
            .set(key, value.into(), RemoteCall::SetDouble(key.into(), value));
    }

    fn set_float(&self, key: &str, value: f32) {
        self.inner
            .lock()
            .set(key, value.into(), RemoteCall::SetFloat(key.into(), value));
    }

    fn set_int(&self, key: &str, value: i32) {
        self.inner
            .lock()
            .set(key, value.into(), RemoteCall::SetInt(key.into(), value));
    }

    fn set_long(&self, key: &str, value: i64) {
        self.inner
            .lock()
            .set(key, value.into(), RemoteCall::SetLong(key.into(), value));
    }

    fn set_string(&self, key: &str, value: &str) {
        self.inner.lock().set(
            key,
            value.into(),
            RemoteCall::SetString(key.into(), value.into()),
        );
    }

    fn set_user_identifier(&self, identifier: &str) {
        self.inner
            .lock()
            .calls
            .push(RemoteCall::UserIdentifier(identifier.into()));
    }

    fn set_user_email(&self, email: &str) {
        self.inner
            .lock()
            .calls
            .push(RemoteCall::UserEmail(email.into()));
    }

    fn set_user_name(&self, name: &str) {
        self.inner.lock().calls.push(RemoteCall::UserName(name.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::LoggedError;
    use std::sync::Arc;

    #[test]
    fn test_report_snapshots_context() {
        let reporter = MemoryReporter::new();
        reporter.set_string("tag", "net");
        reporter.set_int("priority", 6);
        reporter.report_error(Arc::new(LoggedError::new("first")));

        reporter.set_int("priority", 5);
        reporter.report_error(Arc::new(LoggedError::new("second")));

        let reports = reporter.reports();
        assert_eq!(reports.len(), 2);
        assert_eq!(
            reports[0].context_value("priority"),
            Some(&ContextValue::Int(6))
        );
        assert_eq!(
            reports[1].context_value("priority"),
            Some(&ContextValue::Int(5))
        );
        assert_eq!(reports[1].error.to_string(), "second");
        assert_eq!(
            reporter.context_value("tag"),
            Some(ContextValue::String("net".into()))
        );
    }

    #[test]
    fn test_user_fields_are_recorded() {
        let reporter = MemoryReporter::new();
        reporter.set_user_identifier("42");
        reporter.set_user_email("a@example.com");
        reporter.set_user_name("Ada");
        assert_eq!(
            reporter.calls(),
            vec![
                RemoteCall::UserIdentifier("42".into()),
                RemoteCall::UserEmail("a@example.com".into()),
                RemoteCall::UserName("Ada".into()),
            ]
        );
    }

    #[test]
    fn test_clear() {
        let reporter = MemoryReporter::new();
        reporter.set_bool("flag", true);
        reporter.report_error(Arc::new(LoggedError::new("x")));
        reporter.clear();
        assert!(reporter.calls().is_empty());
        assert_eq!(reporter.report_count(), 0);
        assert!(reporter.context_value("flag").is_none());
    }
}
