//! HTTP client for the upstream streaming API.
//!
//! # Responsibilities
//! - Open the long-lived filter stream and decode newline-delimited JSON
//! - Issue retweets, one request per call, never retried
//! - Report connection events through the shared logger

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{self, BoxStream, Stream, StreamExt};
use reqwest::Response;
use tokio::time::timeout;
use url::Url;

use crate::api::types::{decode_stream_line, ApiError, ApiResult, StreamItem, Tweet};
use crate::api::TwitterApi;
use crate::config::{Credentials, StreamConfig};
use crate::logging::Logger;
use crate::{logf, logv};

/// Stream of decoded filter-stream messages.
pub type ItemStream = BoxStream<'static, ApiResult<StreamItem>>;

/// reqwest-backed [`TwitterApi`] implementation.
pub struct TwitterClient {
    http: reqwest::Client,
    config: StreamConfig,
    credentials: Credentials,
    logger: Arc<Logger>,
    request_timeout: Duration,
}

impl TwitterClient {
    pub fn new(
        config: StreamConfig,
        credentials: Credentials,
        logger: Arc<Logger>,
    ) -> ApiResult<Self> {
        let request_timeout = Duration::from_secs(config.request_timeout_secs);
        // No overall timeout: it would cut the stream body.
        let http = reqwest::Client::builder()
            .connect_timeout(request_timeout)
            .build()?;

        tracing::info!(
            stream_url = %config.stream_url,
            api_base_url = %config.api_base_url,
            timeout_secs = config.request_timeout_secs,
            "API client initialized"
        );

        Ok(Self {
            http,
            config,
            credentials,
            logger,
            request_timeout,
        })
    }

    fn retweet_url(&self, id: u64) -> ApiResult<Url> {
        let base = self.config.api_base_url.trim_end_matches('/');
        Ok(Url::parse(&format!("{}/statuses/retweet/{}.json", base, id))?)
    }

    async fn check_status(response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

impl TwitterApi for TwitterClient {
    async fn filter_stream(&self, follow: &[String]) -> ApiResult<ItemStream> {
        let url = Url::parse(&self.config.stream_url)?;
        logv!(self.logger, Debug, "opening filter stream for ", follow.len(), " user ids");

        let request = self
            .http
            .post(url)
            .bearer_auth(&self.credentials.access_token)
            .form(&[("follow", follow.join(","))])
            .send();
        let response = match timeout(self.request_timeout, request).await {
            Ok(result) => result?,
            Err(_) => return Err(ApiError::Timeout(self.config.request_timeout_secs)),
        };
        let response = Self::check_status(response).await?;

        logf!(self.logger, Info, "filter stream connected ({})", response.status());
        Ok(decode_lines(response.bytes_stream()))
    }

    async fn retweet(&self, id: u64) -> ApiResult<Tweet> {
        let url = self.retweet_url(id)?;
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.credentials.access_token)
            .query(&[("trim_user", "false")])
            .timeout(self.request_timeout)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        Ok(response.json::<Tweet>().await?)
    }
}

impl std::fmt::Debug for TwitterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterClient")
            .field("stream_url", &self.config.stream_url)
            .field("api_base_url", &self.config.api_base_url)
            .field("timeout_secs", &self.config.request_timeout_secs)
            .finish()
    }
}

/// Longest stream line accepted before it is discarded.
pub const MAX_LINE_BYTES: usize = 1 << 20;

/// Split a chunked body into lines and decode each one.
///
/// Blank keep-alive lines are skipped. A transport error is yielded once and
/// ends the stream; a malformed line is yielded and decoding continues.
pub fn decode_lines<S, B, E>(chunks: S) -> ItemStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<ApiError> + Send + 'static,
{
    decode_lines_bounded(chunks, MAX_LINE_BYTES)
}

/// [`decode_lines`] with an explicit line limit. A line longer than
/// `max_line` yields [`ApiError::LineTooLong`] once; decoding resumes after
/// its newline.
pub fn decode_lines_bounded<S, B, E>(chunks: S, max_line: usize) -> ItemStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<ApiError> + Send + 'static,
{
    let state = (Box::pin(chunks), LineBuffer::new(max_line), false);
    stream::unfold(state, |(mut chunks, mut lines, mut done)| async move {
        loop {
            let line = match lines.next_line() {
                NextLine::Line(line) => line,
                NextLine::Overflow => {
                    let err = ApiError::LineTooLong(lines.max_line);
                    return Some((Err(err), (chunks, lines, done)));
                }
                NextLine::Pending if done => match lines.take_rest() {
                    Some(rest) => rest,
                    None => return None,
                },
                NextLine::Pending => {
                    match chunks.next().await {
                        Some(Ok(chunk)) => lines.push(chunk.as_ref()),
                        Some(Err(e)) => {
                            lines.clear();
                            return Some((Err(e.into()), (chunks, lines, true)));
                        }
                        None => done = true,
                    }
                    continue;
                }
            };

            match decode_stream_line(&line) {
                Ok(None) => continue,
                Ok(Some(item)) => return Some((Ok(item), (chunks, lines, done))),
                Err(e) => {
                    tracing::debug!(error = %e, "Undecodable stream line");
                    return Some((Err(e), (chunks, lines, done)));
                }
            }
        }
    })
    .boxed()
}

enum NextLine {
    Line(Vec<u8>),
    Overflow,
    Pending,
}

/// Accumulates body chunks and cuts them into lines.
///
/// `scanned` marks how much of `buf` is known to hold no newline, so each
/// chunk is searched once.
struct LineBuffer {
    buf: Vec<u8>,
    scanned: usize,
    discarding: bool,
    max_line: usize,
}

impl LineBuffer {
    fn new(max_line: usize) -> Self {
        Self {
            buf: Vec::new(),
            scanned: 0,
            discarding: false,
            max_line,
        }
    }

    fn push(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    fn clear(&mut self) {
        self.buf.clear();
        self.scanned = 0;
    }

    fn next_line(&mut self) -> NextLine {
        loop {
            let newline = self.buf[self.scanned..].iter().position(|&b| b == b'\n');
            match newline {
                Some(offset) => {
                    let end = self.scanned + offset;
                    let line: Vec<u8> = self.buf.drain(..=end).collect();
                    self.scanned = 0;
                    if self.discarding {
                        // Tail of an oversized line.
                        self.discarding = false;
                        continue;
                    }
                    if line.len() > self.max_line {
                        return NextLine::Overflow;
                    }
                    return NextLine::Line(line);
                }
                None if self.discarding => {
                    self.clear();
                    return NextLine::Pending;
                }
                None if self.buf.len() > self.max_line => {
                    self.clear();
                    self.discarding = true;
                    return NextLine::Overflow;
                }
                None => {
                    self.scanned = self.buf.len();
                    return NextLine::Pending;
                }
            }
        }
    }

    /// Unterminated final line at end of body.
    fn take_rest(&mut self) -> Option<Vec<u8>> {
        if self.discarding || self.buf.is_empty() {
            self.clear();
            return None;
        }
        self.scanned = 0;
        Some(std::mem::take(&mut self.buf))
    }
}
