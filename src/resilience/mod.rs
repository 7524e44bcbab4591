//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Filter stream dropped or failed to open:
//!     → backoff.rs (exponential delay + jitter, reset on successful connect)
//!     → reconnect
//! ```
//!
//! # Design Decisions
//! - Only the stream connection is retried
//! - Retweets are never retried; a failure is logged and the item dropped
//! - Jittered backoff prevents reconnect storms

pub mod backoff;

pub use backoff::{calculate_backoff, Reconnect};
