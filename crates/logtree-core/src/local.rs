//! Local, developer-facing output used by the debug sink.

use crate::event::Throwable;
use crate::level::SeverityLevel;

/// Target used for events emitted by [`TracingOutput`].
pub const TRACING_TARGET: &str = "logtree";

/// Destination for events while the debug sink is active.
pub trait LocalDebugCapability: Send + Sync {
    fn emit(
        &self,
        severity: SeverityLevel,
        tag: Option<&str>,
        message: &str,
        throwable: Option<&Throwable>,
    );
}

/// Forwards events to the installed `tracing` subscriber.
///
/// Severity maps through [`SeverityLevel::tracing_level`]. The tag, numeric
/// priority and error description become structured fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingOutput;

macro_rules! emit_at {
    ($level:expr, $severity:expr, $tag:expr, $message:expr, $throwable:expr) => {
        match $throwable {
            Some(err) => tracing::event!(
                target: TRACING_TARGET,
                $level,
                tag = $tag,
                priority = $severity.priority(),
                error = %err,
                "{}",
                $message
            ),
            None => tracing::event!(
                target: TRACING_TARGET,
                $level,
                tag = $tag,
                priority = $severity.priority(),
                "{}",
                $message
            ),
        }
    };
}

impl LocalDebugCapability for TracingOutput {
    fn emit(
        &self,
        severity: SeverityLevel,
        tag: Option<&str>,
        message: &str,
        throwable: Option<&Throwable>,
    ) {
        let tag = tag.unwrap_or("");
        match severity {
            SeverityLevel::Verbose => {
                emit_at!(tracing::Level::TRACE, severity, tag, message, throwable)
            }
            SeverityLevel::Debug => {
                emit_at!(tracing::Level::DEBUG, severity, tag, message, throwable)
            }
            SeverityLevel::Info => {
                emit_at!(tracing::Level::INFO, severity, tag, message, throwable)
            }
            SeverityLevel::Warn => {
                emit_at!(tracing::Level::WARN, severity, tag, message, throwable)
            }
            SeverityLevel::Error | SeverityLevel::Assert => {
                emit_at!(tracing::Level::ERROR, severity, tag, message, throwable)
            }
        }
    }
}
