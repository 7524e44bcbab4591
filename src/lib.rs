//! Streaming retweet bot with a dual-sink logger.
//!
//! # Architecture Overview
//!
//! ```text
//!   env + config ──▶ main ──▶ bot::Retweeter ──▶ api::TwitterClient ◀──▶ upstream
//!                                  │                    │
//!                                  ▼                    ▼
//!                           logging::Logger ◀───────────┘
//!                             │          │
//!                     journal (native)   fallback (tracing → stdout)
//! ```

// Core
pub mod logging;

// Program
pub mod api;
pub mod bot;
pub mod config;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use bot::Retweeter;
pub use config::BotConfig;
pub use lifecycle::StopHandle;
pub use logging::{Arg, Logger, Severity};
