//! Fallback sink: line-oriented output through `tracing`.

use crate::logging::severity::FallbackLevel;

/// Conventional output stream used when the journal is absent or fails.
///
/// Implementations serialize their own concurrent writes.
pub trait FallbackSink: Send + Sync {
    fn write(&self, level: FallbackLevel, message: &str);
}

/// Forwards fallback writes to the installed `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        TracingSink
    }
}

impl FallbackSink for TracingSink {
    fn write(&self, level: FallbackLevel, message: &str) {
        match level {
            FallbackLevel::Debug => tracing::debug!("{}", message),
            FallbackLevel::Info => tracing::info!("{}", message),
            FallbackLevel::Warn => tracing::warn!("{}", message),
            FallbackLevel::Error => tracing::error!("{}", message),
            FallbackLevel::Fatal => tracing::error!(fatal = true, "{}", message),
            FallbackLevel::Panic => tracing::error!(panic = true, "{}", message),
        }
    }
}
