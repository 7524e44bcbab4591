//! Structured logging.
//!
//! # Responsibilities
//! - Install the `tracing` subscriber that backs the fallback sink
//! - Build the dual-sink [`Logger`] from configuration
//!
//! # Design Decisions
//! - JSON format for production, pretty format for development
//! - `RUST_LOG` overrides the configured level

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};
use crate::logging::{JournalSink, Logger, TracingSink};

/// Filter from `RUST_LOG`, or from the configured level when unset.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Install the global subscriber. Call once at startup.
pub fn init(config: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(env_filter(config));
    match config.format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Compact => registry
            .with(tracing_subscriber::fmt::layer().compact())
            .init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

/// Journal sink configured from `config`.
pub fn journal_sink(config: &LoggingConfig) -> JournalSink {
    if config.journal_enabled {
        JournalSink::with_socket(&config.journal_socket).identifier(config.syslog_identifier.clone())
    } else {
        JournalSink::disabled()
    }
}

/// Logger writing to the configured journal with `tracing` as fallback.
pub fn build_logger(config: &LoggingConfig) -> Logger {
    Logger::new(Arc::new(journal_sink(config)), Arc::new(TracingSink::new()))
}
