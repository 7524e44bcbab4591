//! Upstream API subsystem.
//!
//! # Data Flow
//! ```text
//! Environment (credentials) + StreamConfig
//!     → client.rs (filter stream POST, newline-delimited JSON body)
//!     → types.rs (line → StreamItem::{Tweet, Other})
//!     → bot::Retweeter (filter, retweet)
//!     → client.rs (retweet POST)
//! ```
//!
//! # Design Decisions
//! - The bot depends on the `TwitterApi` trait, not on the HTTP client
//! - Request signing is out of scope; the access token is sent as a bearer credential
//! - The client reports through the same `Logger` as the bot

use std::future::Future;
use std::sync::Arc;

pub mod client;
pub mod types;

pub use client::{ItemStream, TwitterClient};
pub use types::{ApiError, ApiResult, StreamItem, Tweet, User};

/// Operations the bot needs from the social network.
pub trait TwitterApi: Send + Sync {
    /// Open the filter stream for tweets from `follow`.
    fn filter_stream(
        &self,
        follow: &[String],
    ) -> impl Future<Output = ApiResult<ItemStream>> + Send;

    /// Retweet status `id`, returning the new retweet.
    fn retweet(&self, id: u64) -> impl Future<Output = ApiResult<Tweet>> + Send;
}

impl<T: TwitterApi> TwitterApi for Arc<T> {
    fn filter_stream(
        &self,
        follow: &[String],
    ) -> impl Future<Output = ApiResult<ItemStream>> + Send {
        (**self).filter_stream(follow)
    }

    fn retweet(&self, id: u64) -> impl Future<Output = ApiResult<Tweet>> + Send {
        (**self).retweet(id)
    }
}
