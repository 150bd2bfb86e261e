//! Per-call log event and the error payloads it carries.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::level::SeverityLevel;

/// An error attached to a log call.
///
/// Shared so the remote reporter receives the caller's exact error object.
pub type Throwable = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Error synthesized for the remote reporter when a log call carries no
/// throwable. Its description is the log message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct LoggedError {
    message: String,
}

impl LoggedError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A single log call, built fresh for every call and consumed by the active
/// sink.
#[derive(Clone)]
pub struct LogEvent {
    /// Severity of the event
    pub severity: SeverityLevel,
    /// Optional tag, typically the calling module path
    pub tag: Option<String>,
    /// Rendered message; empty when only a throwable was logged
    pub message: String,
    /// Error attached to the call, if any
    pub throwable: Option<Throwable>,
}

impl LogEvent {
    /// Create an event with a message and no tag or throwable.
    pub fn new(severity: SeverityLevel, message: impl Into<String>) -> Self {
        Self {
            severity,
            tag: None,
            message: message.into(),
            throwable: None,
        }
    }

    /// Create an event that only carries an error.
    ///
    /// The message becomes the error's description so the remote metadata
    /// still has something to show.
    pub fn from_throwable(severity: SeverityLevel, throwable: Throwable) -> Self {
        Self {
            severity,
            tag: None,
            message: throwable.to_string(),
            throwable: Some(throwable),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_throwable(mut self, throwable: Throwable) -> Self {
        self.throwable = Some(throwable);
        self
    }

    /// The error the remote reporter should receive: the attached throwable
    /// unchanged, or a [`LoggedError`] carrying the message.
    pub fn reportable_error(&self) -> Throwable {
        match &self.throwable {
            Some(throwable) => Arc::clone(throwable),
            None => Arc::new(LoggedError::new(self.message.clone())),
        }
    }
}

impl fmt::Debug for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogEvent")
            .field("severity", &self.severity)
            .field("tag", &self.tag)
            .field("message", &self.message)
            .field("throwable", &self.throwable.as_ref().map(|t| t.to_string()))
            .finish()
    }
}
