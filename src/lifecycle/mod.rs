//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → init tracing → build logger → check credentials → run bot
//!
//! Stop (stop.rs):
//!     StopHandle::stop → latched flag → every StopSignal resolves → bot stops the stream
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → StopHandle::stop
//! ```
//!
//! # Design Decisions
//! - Fail fast: a missing credential is fatal before any stream is opened
//! - A stop requested before the bot subscribes is not lost
//! - Fatal log calls exit directly and do not go through the stop handle

pub mod signals;
pub mod stop;

pub use stop::{StopHandle, StopSignal};
