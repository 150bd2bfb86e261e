//! Severity levels and the ignored-level policy
//!
//! ```text
//! Verbose(2) < Debug(3) < Info(4) < Warn(5) < Error(6) < Assert(7)
//!
//! default ignored set: { Verbose, Debug, Info }
//! ```
//!
//! An [`IgnoredLevelSet`] can only be obtained through the default policy or a
//! successful [`IgnoredLevelSet::try_from_levels`], so a set that reaches the
//! remote sink is never empty.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{LogTreeError, LogTreeResult};

/// Ordinal severity of a log event.
///
/// Discriminants match the numeric priorities hosts pass to
/// [`LogDispatcher::log`](crate::LogDispatcher::log).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(i32)]
pub enum SeverityLevel {
    Verbose = 2,
    Debug = 3,
    Info = 4,
    Warn = 5,
    Error = 6,
    Assert = 7,
}

impl SeverityLevel {
    /// Every level, lowest priority first.
    pub const ALL: [SeverityLevel; 6] = [
        SeverityLevel::Verbose,
        SeverityLevel::Debug,
        SeverityLevel::Info,
        SeverityLevel::Warn,
        SeverityLevel::Error,
        SeverityLevel::Assert,
    ];

    /// Numeric priority of this level.
    pub const fn priority(self) -> i32 {
        self as i32
    }

    /// Look up a level by its numeric priority.
    pub fn from_priority(priority: i32) -> LogTreeResult<Self> {
        match priority {
            2 => Ok(Self::Verbose),
            3 => Ok(Self::Debug),
            4 => Ok(Self::Info),
            5 => Ok(Self::Warn),
            6 => Ok(Self::Error),
            7 => Ok(Self::Assert),
            other => Err(LogTreeError::InvalidPriority(other)),
        }
    }

    /// Lowercase name used in configuration and output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Verbose => "verbose",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Assert => "assert",
        }
    }

    /// The `tracing` level a local debug output should use for this severity.
    ///
    /// `tracing` has no level above ERROR, so `Assert` shares it.
    pub const fn tracing_level(self) -> tracing::Level {
        match self {
            Self::Verbose => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error | Self::Assert => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeverityLevel {
    type Err = LogTreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if let Ok(priority) = name.parse::<i32>() {
            return Self::from_priority(priority);
        }
        match name.to_lowercase().as_str() {
            "verbose" | "v" | "trace" => Ok(Self::Verbose),
            "debug" | "d" => Ok(Self::Debug),
            "info" | "i" => Ok(Self::Info),
            "warn" | "warning" | "w" => Ok(Self::Warn),
            "error" | "e" => Ok(Self::Error),
            "assert" | "a" | "wtf" => Ok(Self::Assert),
            _ => Err(LogTreeError::UnknownLevel(s.to_string())),
        }
    }
}

impl TryFrom<i32> for SeverityLevel {
    type Error = LogTreeError;

    fn try_from(priority: i32) -> Result<Self, LogTreeError> {
        Self::from_priority(priority)
    }
}

/// Set of severities the remote sink drops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredLevelSet {
    levels: BTreeSet<SeverityLevel>,
}

impl IgnoredLevelSet {
    /// Build a set from explicit levels.
    ///
    /// Duplicates collapse. Fails with [`LogTreeError::EmptyLevelSet`] when no
    /// level is given.
    pub fn try_from_levels<I>(levels: I) -> LogTreeResult<Self>
    where
        I: IntoIterator<Item = SeverityLevel>,
    {
        let levels: BTreeSet<_> = levels.into_iter().collect();
        if levels.is_empty() {
            return Err(LogTreeError::EmptyLevelSet);
        }
        Ok(Self { levels })
    }

    /// Whether events at `level` are suppressed.
    pub fn contains(&self, level: SeverityLevel) -> bool {
        self.levels.contains(&level)
    }

    /// Number of distinct levels in the set. Always at least one.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always `false`: construction rejects empty sets.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Iterate the levels, lowest priority first.
    pub fn iter(&self) -> impl Iterator<Item = SeverityLevel> + '_ {
        self.levels.iter().copied()
    }
}

impl Default for IgnoredLevelSet {
    fn default() -> Self {
        default_ignored_levels()
    }
}

impl fmt::Display for IgnoredLevelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(SeverityLevel::as_str).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

/// The fixed default policy: `{Verbose, Debug, Info}`.
pub fn default_ignored_levels() -> IgnoredLevelSet {
    IgnoredLevelSet {
        levels: [
            SeverityLevel::Verbose,
            SeverityLevel::Debug,
            SeverityLevel::Info,
        ]
        .into_iter()
        .collect(),
    }
}

/// Build an ignored set from `explicit`, falling back to the default policy
/// when nothing usable is supplied.
pub fn resolve_ignored_levels(explicit: &[SeverityLevel]) -> IgnoredLevelSet {
    IgnoredLevelSet::try_from_levels(explicit.iter().copied())
        .unwrap_or_else(|_| default_ignored_levels())
}

/// Like [`resolve_ignored_levels`] but for level names such as `"info"` or
/// `"5"`.
///
/// A single unparseable name discards the whole input and yields the default
/// policy.
pub fn resolve_ignored_level_names<S: AsRef<str>>(names: &[S]) -> IgnoredLevelSet {
    names
        .iter()
        .map(|name| name.as_ref().parse::<SeverityLevel>())
        .collect::<LogTreeResult<Vec<_>>>()
        .and_then(IgnoredLevelSet::try_from_levels)
        .unwrap_or_else(|_| default_ignored_levels())
}
