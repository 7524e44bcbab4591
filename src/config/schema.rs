//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from a TOML file, and
//! every field has a default so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::logging::journal::DEFAULT_JOURNAL_SOCKET;

/// Root configuration for the bot.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BotConfig {
    /// Upstream stream and API settings.
    pub stream: StreamConfig,

    /// Log output settings.
    pub logging: LoggingConfig,
}

/// Upstream stream and API settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Base URL for REST calls (retweet).
    pub api_base_url: String,

    /// Filter stream endpoint.
    pub stream_url: String,

    /// User ids whose tweets are retweeted.
    pub follow: Vec<String>,

    /// Timeout for REST calls and for opening the stream, in seconds.
    pub request_timeout_secs: u64,

    /// Base delay before reconnecting a dropped stream, in milliseconds.
    pub reconnect_base_ms: u64,

    /// Upper bound on the reconnect delay, in milliseconds.
    pub reconnect_max_ms: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.twitter.com/1.1".to_string(),
            stream_url: "https://stream.twitter.com/1.1/statuses/filter.json".to_string(),
            follow: vec!["622020160".to_string()],
            request_timeout_secs: 30,
            reconnect_base_ms: 1_000,
            reconnect_max_ms: 320_000,
        }
    }
}

/// Output format of the fallback log stream.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive for the fallback stream (e.g. "info", "retweeter=debug").
    pub level: String,

    /// Fallback stream format.
    pub format: LogFormat,

    /// Try the systemd journal before the fallback stream.
    pub journal_enabled: bool,

    /// Path of the journald native socket.
    pub journal_socket: String,

    /// `SYSLOG_IDENTIFIER` attached to journal entries. Empty disables it.
    pub syslog_identifier: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            journal_enabled: true,
            journal_socket: DEFAULT_JOURNAL_SOCKET.to_string(),
            syslog_identifier: "retweeter".to_string(),
        }
    }
}
