//! Severity levels and their fixed routing.
//!
//! Every [`Severity`] maps to at most one journal [`Priority`] and exactly one
//! [`FallbackLevel`]. The table is static; sink availability is the only
//! per-call input to routing.

use std::fmt;

/// Logical severity of a log call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Notice,
    Warning,
    Error,
    Critical,
    Panic,
    Fatal,
}

impl Severity {
    /// All severities, least to most severe.
    pub const ALL: [Severity; 8] = [
        Severity::Debug,
        Severity::Info,
        Severity::Notice,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
        Severity::Panic,
        Severity::Fatal,
    ];

    /// Journal priority for this severity.
    ///
    /// `None` means the severity never reaches the structured sink: Debug
    /// because the journal priority set has no debug code, Panic because it
    /// writes to the fallback sink only.
    pub fn priority(self) -> Option<Priority> {
        match self {
            Severity::Debug | Severity::Panic => None,
            Severity::Info => Some(Priority::Info),
            Severity::Notice => Some(Priority::Notice),
            Severity::Warning => Some(Priority::Warning),
            Severity::Error => Some(Priority::Error),
            Severity::Critical => Some(Priority::Critical),
            Severity::Fatal => Some(Priority::Emergency),
        }
    }

    /// Level used when the message goes through the fallback sink.
    pub fn fallback_level(self) -> FallbackLevel {
        match self {
            Severity::Debug => FallbackLevel::Debug,
            Severity::Info | Severity::Notice => FallbackLevel::Info,
            Severity::Warning => FallbackLevel::Warn,
            Severity::Error | Severity::Critical => FallbackLevel::Error,
            Severity::Panic => FallbackLevel::Panic,
            Severity::Fatal => FallbackLevel::Fatal,
        }
    }

    /// Whether a call at this severity ends the process (or unwinds).
    pub fn is_terminal(self) -> bool {
        matches!(self, Severity::Panic | Severity::Fatal)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Notice => "notice",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
            Severity::Panic => "panic",
            Severity::Fatal => "fatal",
        };
        f.write_str(name)
    }
}

/// Journal priority (syslog numeric codes). Debug has no journal priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    Emergency,
    Critical,
    Error,
    Warning,
    Notice,
    Info,
}

impl Priority {
    /// Numeric code written to the `PRIORITY=` field.
    pub fn code(self) -> u8 {
        match self {
            Priority::Emergency => 0,
            Priority::Critical => 2,
            Priority::Error => 3,
            Priority::Warning => 4,
            Priority::Notice => 5,
            Priority::Info => 6,
        }
    }
}

/// Level understood by the fallback sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackLevel {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    Panic,
}
