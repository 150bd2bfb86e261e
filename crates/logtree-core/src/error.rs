//! Error types for logtree
//!
//! These errors only surface on configuration and parsing paths. The logging
//! calls on [`LogDispatcher`](crate::LogDispatcher) never return them.

use thiserror::Error;

/// Main error type for logtree configuration and parsing
#[derive(Error, Debug)]
pub enum LogTreeError {
    /// A severity name could not be parsed
    #[error("Unknown log level: {0}")]
    UnknownLevel(String),

    /// A numeric priority outside the 2..=7 range
    #[error("Invalid log priority: {0}")]
    InvalidPriority(i32),

    /// An explicit ignored-level set contained no levels
    #[error("Ignored level set is empty")]
    EmptyLevelSet,

    /// Configuration value could not be interpreted
    #[error("Configuration error: {0}")]
    Config(String),

    /// General I/O error (reading configuration files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON configuration could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using LogTreeError
pub type LogTreeResult<T> = Result<T, LogTreeError>;
