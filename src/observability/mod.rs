//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Operator-facing outcomes (retweeted, could not retweet, ...):
//!     → crate::logging::Logger → journal, or tracing when absent
//!
//! Internal diagnostics (connects, reconnect delays, decode errors):
//!     → tracing macros with structured fields
//!
//! Both fallback lines and diagnostics:
//!     → logging.rs subscriber (pretty / compact / json on stdout)
//! ```

pub mod logging;
