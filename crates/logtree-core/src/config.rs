//! Provider configuration loaded from JSON and the environment.
//!
//! ```json
//! { "debug": false, "ignored_levels": ["verbose", "debug", "info"] }
//! ```
//!
//! Environment overrides:
//! - `LOGTREE_DEBUG`: `1`/`true`/`yes`/`on` or `0`/`false`/`no`/`off`
//! - `LOGTREE_IGNORED_LEVELS`: comma-separated level names

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LogTreeError, LogTreeResult};
use crate::level::{resolve_ignored_level_names, IgnoredLevelSet};

/// Environment variable overriding [`ProviderConfig::debug`]
pub const ENV_DEBUG: &str = "LOGTREE_DEBUG";

/// Environment variable overriding [`ProviderConfig::ignored_levels`]
pub const ENV_IGNORED_LEVELS: &str = "LOGTREE_IGNORED_LEVELS";

/// Settings for a [`StaticProvider`](crate::StaticProvider).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Route events to the debug sink instead of the remote sink
    #[serde(default)]
    pub debug: bool,

    /// Level names the remote sink drops. Empty means the default policy.
    #[serde(default)]
    pub ignored_levels: Vec<String>,
}

impl ProviderConfig {
    /// Parse configuration from a JSON document.
    pub fn from_json(json: &str) -> LogTreeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> LogTreeResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Apply `LOGTREE_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> LogTreeResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> LogTreeResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_DEBUG) {
            self.debug = parse_bool(&value)?;
        }
        if let Some(value) = lookup(ENV_IGNORED_LEVELS) {
            self.ignored_levels = value
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from)
                .collect();
        }
        Ok(())
    }

    /// The ignored set this configuration resolves to.
    pub fn ignored_level_set(&self) -> IgnoredLevelSet {
        resolve_ignored_level_names(&self.ignored_levels)
    }
}

fn parse_bool(value: &str) -> LogTreeResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(LogTreeError::Config(format!(
            "{} must be a boolean, got '{}'",
            ENV_DEBUG, other
        ))),
    }
}
