//! Stream consumer: filter items and retweet qualifying tweets.

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::time::sleep;

use crate::api::{StreamItem, TwitterApi};
use crate::config::StreamConfig;
use crate::lifecycle::StopSignal;
use crate::logf;
use crate::logging::Logger;
use crate::resilience::Reconnect;

/// What happened to one stream item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Retweeted(u64),
    /// The tweet was itself a retweet.
    SkippedRetweet(u64),
    /// The retweet request failed. Not retried.
    Failed(u64),
    /// Not a tweet; carries the message kind.
    Unexpected(String),
}

/// Counters for one `run`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub retweeted: u64,
    pub skipped: u64,
    pub failed: u64,
    pub unexpected: u64,
    pub reconnects: u64,
}

impl RunStats {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Retweeted(_) => self.retweeted += 1,
            Outcome::SkippedRetweet(_) => self.skipped += 1,
            Outcome::Failed(_) => self.failed += 1,
            Outcome::Unexpected(_) => self.unexpected += 1,
        }
    }
}

/// Retweets every original tweet from the followed accounts.
pub struct Retweeter<A> {
    api: A,
    logger: Arc<Logger>,
    follow: Vec<String>,
    reconnect: Reconnect,
}

impl<A: TwitterApi> Retweeter<A> {
    pub fn new(api: A, logger: Arc<Logger>, config: &StreamConfig) -> Self {
        Self {
            api,
            logger,
            follow: config.follow.clone(),
            reconnect: Reconnect::from_config(config),
        }
    }

    /// Process one stream item.
    pub async fn handle(&self, item: StreamItem) -> Outcome {
        let tweet = match item {
            StreamItem::Tweet(tweet) => tweet,
            StreamItem::Other { kind } => {
                logf!(self.logger, Warning, "received unexpected value of type {}", kind);
                return Outcome::Unexpected(kind);
            }
        };

        if tweet.is_retweet() {
            tracing::debug!(id = tweet.id, "Skipping retweet");
            return Outcome::SkippedRetweet(tweet.id);
        }

        match self.api.retweet(tweet.id).await {
            Ok(_) => {
                logf!(self.logger, Notice, "retweeted {}", tweet.id);
                Outcome::Retweeted(tweet.id)
            }
            Err(e) => {
                logf!(self.logger, Error, "could not retweet {}: {}", tweet.id, e);
                Outcome::Failed(tweet.id)
            }
        }
    }

    /// Consume the filter stream until stopped, reconnecting with backoff
    /// whenever it fails to open or ends.
    pub async fn run(mut self, mut stop: StopSignal) -> RunStats {
        let mut stats = RunStats::default();
        tracing::info!(follow = ?self.follow, "Retweeter starting");

        loop {
            let opened = tokio::select! {
                biased;
                _ = stop.stopped() => break,
                opened = self.api.filter_stream(&self.follow) => opened,
            };

            match opened {
                Ok(mut stream) => {
                    self.reconnect.reset();
                    loop {
                        tokio::select! {
                            biased;
                            _ = stop.stopped() => {
                                tracing::info!("Stopping filter stream");
                                return stats;
                            }
                            next = stream.next() => match next {
                                Some(Ok(item)) => {
                                    let outcome = self.handle(item).await;
                                    stats.record(&outcome);
                                }
                                Some(Err(e)) => {
                                    logf!(self.logger, Warning, "filter stream error: {}", e);
                                }
                                None => {
                                    tracing::info!("Filter stream closed");
                                    break;
                                }
                            }
                        }
                    }
                }
                Err(e) => {
                    logf!(self.logger, Error, "could not open filter stream: {}", e);
                }
            }

            let delay = self.reconnect.next_delay();
            stats.reconnects += 1;
            tracing::info!(
                attempt = self.reconnect.attempt(),
                delay_ms = delay.as_millis() as u64,
                "Reconnecting filter stream"
            );
            tokio::select! {
                biased;
                _ = stop.stopped() => break,
                _ = sleep(delay) => {}
            }
        }

        tracing::info!(?stats, "Retweeter stopped");
        stats
    }
}
