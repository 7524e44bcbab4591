//! Wire types and error definitions for the upstream API.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A status as delivered on the filter stream or returned by a retweet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Tweet {
    pub id: u64,

    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub user: Option<User>,

    /// Present when this status is itself a retweet.
    #[serde(default)]
    pub retweeted_status: Option<Box<Tweet>>,
}

impl Tweet {
    pub fn is_retweet(&self) -> bool {
        self.retweeted_status.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: u64,

    #[serde(default)]
    pub screen_name: String,
}

/// One message from the filter stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamItem {
    Tweet(Tweet),
    /// Any other stream message, named by its top-level key
    /// (`delete`, `limit`, `warning`, ...).
    Other { kind: String },
}

/// Errors that can occur talking to the upstream API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, TLS or body read failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Stream did not answer within the configured timeout.
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// Non-success status code.
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// A stream line grew past the buffer limit without a newline. The
    /// rest of that line is discarded.
    #[error("stream line exceeds {0} bytes")]
    LineTooLong(usize),

    /// A stream line that is not valid JSON.
    #[error("malformed stream message: {0}")]
    Decode(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Decode one line of the filter stream.
///
/// Returns `Ok(None)` for keep-alive blank lines.
pub fn decode_stream_line(line: &[u8]) -> ApiResult<Option<StreamItem>> {
    let trimmed = line.trim_ascii();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: serde_json::Value = serde_json::from_slice(trimmed)?;
    let is_tweet = value
        .as_object()
        .map(|obj| obj.contains_key("id") && obj.contains_key("text"))
        .unwrap_or(false);

    if is_tweet {
        let tweet: Tweet = serde_json::from_value(value)?;
        return Ok(Some(StreamItem::Tweet(tweet)));
    }

    // Key order is preserved (serde_json `preserve_order`).
    let kind = value
        .as_object()
        .and_then(|obj| obj.keys().next().cloned())
        .unwrap_or_else(|| "unknown".to_string());
    Ok(Some(StreamItem::Other { kind }))
}
