//! Host-supplied source of truth for the debug flag and ignored-level policy.
//!
//! The host owns its provider. [`LogDispatcher`](crate::LogDispatcher) keeps
//! only a weak reference, so dropping the provider never leaks through the
//! logger and the logger never keeps a host object alive.

use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use crate::config::ProviderConfig;
use crate::level::{default_ignored_levels, resolve_ignored_level_names, IgnoredLevelSet};

/// Capability the host application implements to drive sink selection.
pub trait ApplicationProvider: Send + Sync {
    /// `true` selects the debug sink, `false` the remote sink.
    fn is_debug(&self) -> bool;

    /// Severities the remote sink should drop.
    ///
    /// Queried on every remote event, so changes apply immediately.
    fn ignored_log_levels(&self) -> IgnoredLevelSet {
        default_ignored_levels()
    }

    /// Opaque handle to the host application, if it exposes one.
    fn application_context(&self) -> Option<&(dyn Any + Send + Sync)> {
        None
    }
}

/// Provider backed by plain values, adjustable at runtime.
///
/// Built from a [`ProviderConfig`] in hosts that have no richer notion of
/// environment.
pub struct StaticProvider {
    debug: AtomicBool,
    ignored: RwLock<IgnoredLevelSet>,
    context: Option<Box<dyn Any + Send + Sync>>,
}

impl StaticProvider {
    /// Create a provider with the default ignored-level policy.
    pub fn new(debug: bool) -> Self {
        Self {
            debug: AtomicBool::new(debug),
            ignored: RwLock::new(default_ignored_levels()),
            context: None,
        }
    }

    /// Create a provider from configuration. Unusable level names fall back
    /// to the default policy.
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self {
            debug: AtomicBool::new(config.debug),
            ignored: RwLock::new(resolve_ignored_level_names(&config.ignored_levels)),
            context: None,
        }
    }

    pub fn with_ignored_levels(self, levels: IgnoredLevelSet) -> Self {
        *self.ignored.write() = levels;
        self
    }

    /// Attach an opaque host handle returned by
    /// [`ApplicationProvider::application_context`].
    pub fn with_context<C: Any + Send + Sync>(mut self, context: C) -> Self {
        self.context = Some(Box::new(context));
        self
    }

    /// Flip the debug flag. Only affects the next `initialize`.
    pub fn set_debug(&self, debug: bool) {
        self.debug.store(debug, Ordering::SeqCst);
    }

    /// Replace the ignored-level policy. Takes effect on the next remote event.
    pub fn set_ignored_levels(&self, levels: IgnoredLevelSet) {
        *self.ignored.write() = levels;
    }
}

impl ApplicationProvider for StaticProvider {
    fn is_debug(&self) -> bool {
        self.debug.load(Ordering::SeqCst)
    }

    fn ignored_log_levels(&self) -> IgnoredLevelSet {
        self.ignored.read().clone()
    }

    fn application_context(&self) -> Option<&(dyn Any + Send + Sync)> {
        self.context.as_deref()
    }
}

impl std::fmt::Debug for StaticProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticProvider")
            .field("debug", &self.is_debug())
            .field("ignored", &*self.ignored.read())
            .field("has_context", &self.context.is_some())
            .finish()
    }
}
