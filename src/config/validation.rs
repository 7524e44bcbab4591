//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, backoff bounds ordered)
//! - Check URLs and follow ids are usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BotConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;
use url::Url;

use crate::config::schema::BotConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("stream.follow must list at least one user id")]
    NoFollowIds,

    #[error("stream.follow contains non-numeric id {0:?}")]
    InvalidFollowId(String),

    #[error("{field} is not a valid URL: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{0} must be greater than 0")]
    ZeroValue(&'static str),

    #[error("stream.reconnect_base_ms ({base}) exceeds stream.reconnect_max_ms ({max})")]
    BackoffBounds { base: u64, max: u64 },
}

/// Check a parsed configuration.
pub fn validate_config(config: &BotConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let stream = &config.stream;

    if stream.follow.is_empty() {
        errors.push(ValidationError::NoFollowIds);
    }
    for id in &stream.follow {
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
            errors.push(ValidationError::InvalidFollowId(id.clone()));
        }
    }

    for (field, value) in [
        ("stream.api_base_url", &stream.api_base_url),
        ("stream.stream_url", &stream.stream_url),
    ] {
        if Url::parse(value).is_err() {
            errors.push(ValidationError::InvalidUrl {
                field,
                value: value.clone(),
            });
        }
    }

    if stream.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue("stream.request_timeout_secs"));
    }
    if stream.reconnect_base_ms == 0 {
        errors.push(ValidationError::ZeroValue("stream.reconnect_base_ms"));
    }
    if stream.reconnect_base_ms > stream.reconnect_max_ms {
        errors.push(ValidationError::BackoffBounds {
            base: stream.reconnect_base_ms,
            max: stream.reconnect_max_ms,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
