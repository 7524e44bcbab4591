//! API credentials from the environment.
//!
//! # Security
//! - Credentials are loaded ONLY from environment variables
//! - Secrets are redacted from `Debug` output and never logged

use std::fmt;

use thiserror::Error;

pub const CONSUMER_KEY_ENV_VAR: &str = "TWITTER_CONSUMER_KEY";
pub const CONSUMER_SECRET_ENV_VAR: &str = "TWITTER_CONSUMER_SECRET";
pub const ACCESS_TOKEN_ENV_VAR: &str = "TWITTER_ACCESS_TOKEN";
pub const ACCESS_TOKEN_SECRET_ENV_VAR: &str = "TWITTER_ACCESS_TOKEN_SECRET";

/// Variables read at startup, in order.
pub const REQUIRED_ENV_VARS: [&str; 4] = [
    CONSUMER_KEY_ENV_VAR,
    CONSUMER_SECRET_ENV_VAR,
    ACCESS_TOKEN_ENV_VAR,
    ACCESS_TOKEN_SECRET_ENV_VAR,
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialsError {
    /// Variable unset or empty.
    #[error("environment variable missing: {0}")]
    Missing(&'static str),
}

/// The four values needed to act on behalf of the account.
#[derive(Clone)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl Credentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> Result<Self, CredentialsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials through `lookup`. Fails on the first variable that
    /// is absent or empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CredentialsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &'static str| match lookup(key) {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(CredentialsError::Missing(key)),
        };

        Ok(Self {
            consumer_key: get(CONSUMER_KEY_ENV_VAR)?,
            consumer_secret: get(CONSUMER_SECRET_ENV_VAR)?,
            access_token: get(ACCESS_TOKEN_ENV_VAR)?,
            access_token_secret: get(ACCESS_TOKEN_SECRET_ENV_VAR)?,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}
