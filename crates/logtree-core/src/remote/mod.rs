//! Remote crash-reporting capability.
//!
//! The dispatcher only ever talks to the backend through [`RemoteReporter`].
//! Transport, buffering and retries belong to the implementation and must not
//! surface to the caller.

pub mod memory;

use std::any::Any;
use std::fmt;

use crate::event::Throwable;

pub use memory::{MemoryReporter, RemoteCall};

/// Operations a crash-reporting backend exposes to the dispatcher.
pub trait RemoteReporter: Send + Sync {
    /// Report an error. Always receives an error object, never a bare string.
    fn report_error(&self, error: Throwable);

    fn set_bool(&self, key: &str, value: bool);
    fn set_double(&self, key: &str, value: f64);
    fn set_float(&self, key: &str, value: f32);
    fn set_int(&self, key: &str, value: i32);
    fn set_long(&self, key: &str, value: i64);
    fn set_string(&self, key: &str, value: &str);

    fn set_user_identifier(&self, identifier: &str);
    fn set_user_email(&self, email: &str);
    fn set_user_name(&self, name: &str);
}

/// A typed context value; each variant maps to one [`RemoteReporter`] setter.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextValue {
    Bool(bool),
    Double(f64),
    Float(f32),
    Int(i32),
    Long(i64),
    String(String),
}

impl ContextValue {
    /// Recover a typed value from a runtime-typed one.
    ///
    /// Returns `None` for anything that is not `bool`, `f64`, `f32`, `i32`,
    /// `i64`, `String` or `&str`.
    pub fn from_any(value: &dyn Any) -> Option<Self> {
        if let Some(v) = value.downcast_ref::<bool>() {
            Some(Self::Bool(*v))
        } else if let Some(v) = value.downcast_ref::<f64>() {
            Some(Self::Double(*v))
        } else if let Some(v) = value.downcast_ref::<f32>() {
            Some(Self::Float(*v))
        } else if let Some(v) = value.downcast_ref::<i32>() {
            Some(Self::Int(*v))
        } else if let Some(v) = value.downcast_ref::<i64>() {
            Some(Self::Long(*v))
        } else if let Some(v) = value.downcast_ref::<String>() {
            Some(Self::String(v.clone()))
        } else {
            value
                .downcast_ref::<&str>()
                .map(|v| Self::String((*v).to_string()))
        }
    }

    /// Hand this value to the matching setter.
    pub fn apply(&self, reporter: &dyn RemoteReporter, key: &str) {
        match self {
            Self::Bool(v) => reporter.set_bool(key, *v),
            Self::Double(v) => reporter.set_double(key, *v),
            Self::Float(v) => reporter.set_float(key, *v),
            Self::Int(v) => reporter.set_int(key, *v),
            Self::Long(v) => reporter.set_long(key, *v),
            Self::String(v) => reporter.set_string(key, v),
        }
    }
}

impl fmt::Display for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{}", v),
            Self::Double(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Long(v) => write!(f, "{}", v),
            Self::String(v) => f.write_str(v),
        }
    }
}

impl From<bool> for ContextValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for ContextValue {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<f32> for ContextValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<i32> for ContextValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for ContextValue {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<String> for ContextValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for ContextValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}
