//! Bot subsystem.
//!
//! # Data Flow
//! ```text
//! filter stream item
//!     → not a tweet        → warning "received unexpected value of type .."
//!     → tweet is a retweet → skipped silently
//!     → retweet            → notice "retweeted .." / error "could not retweet ..: .."
//! ```
//!
//! # Design Decisions
//! - Items are handled one at a time in stream order
//! - A failed retweet is reported and dropped, never retried
//! - Stream loss triggers reconnect with backoff; a stop request ends the stream

pub mod retweeter;

pub use retweeter::{Outcome, RunStats, Retweeter};
