//! Dual-sink logging subsystem.
//!
//! # Data Flow
//! ```text
//! caller: logger.noticef(format_args!(..)) / logger.notice(&[args])
//!     → router.rs   (severity → journal priority + fallback level)
//!     → journal.rs  (is_available? send PRIORITY/MESSAGE datagram)
//!         on failure → fallback.rs at Error ("error printing to systemd journal")
//!     → fallback.rs (only when the journal was skipped)
//!     → terminate.rs (Fatal: exit 1, Panic: unwind)
//! ```
//!
//! # Design Decisions
//! - Journal availability is probed on every call, never cached
//! - Logging never returns an error to the caller
//! - Debug and Panic never touch the journal
//! - A successful journal write suppresses the fallback line

pub mod fallback;
pub mod format;
pub mod journal;
pub mod router;
pub mod severity;
pub mod terminate;

pub use fallback::{FallbackSink, TracingSink};
pub use format::{join, Arg};
pub use journal::{JournalError, JournalSink, StructuredSink};
pub use router::{Logger, Message};
pub use severity::{FallbackLevel, Priority, Severity};
pub use terminate::{ProcessExit, Terminator};

/// Log a format template at the given severity.
///
/// ```ignore
/// logf!(logger, Notice, "retweeted {}", id);
/// ```
#[macro_export]
macro_rules! logf {
    ($logger:expr, $severity:ident, $($fmt:tt)+) => {
        $logger.emit(
            $crate::logging::Severity::$severity,
            $crate::logging::Message::Formatted(format_args!($($fmt)+)),
        )
    };
}

/// Log an argument list, joined with the text/value spacing rule.
///
/// ```ignore
/// logv!(logger, Info, "stream opened for ", follow.len(), " ids");
/// ```
#[macro_export]
macro_rules! logv {
    ($logger:expr, $severity:ident $(, $arg:expr)* $(,)?) => {
        $logger.emit(
            $crate::logging::Severity::$severity,
            $crate::logging::Message::Joined(&[$($crate::logging::Arg::from($arg)),*]),
        )
    };
}
