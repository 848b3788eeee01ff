//! HTTP and time seams for the commit fetcher.
//!
//! The fetcher only ever needs one authenticated GET and a blocking sleep, so
//! both are expressed as small traits. `HttpTransport` and `SystemClock` are
//! the production implementations.

use crate::error::FetchError;
use chrono::Utc;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, LINK};
use std::time::Duration;
use tracing::debug;

/// Header carrying the Unix timestamp at which the rate-limit window resets.
pub const RATE_LIMIT_RESET: &str = "x-ratelimit-reset";

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

const REQUEST_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// The parts of an HTTP response the fetcher looks at.
#[derive(Debug, Clone, Default)]
pub struct PageResponse {
    pub status: u16,
    pub link: Option<String>,
    pub rate_limit_reset: Option<i64>,
    pub body: String,
}

pub trait Transport {
    /// Issues one GET against `url`. Only connection-level failures are
    /// errors; any HTTP status comes back as a `PageResponse`.
    fn get(&self, url: &str) -> Result<PageResponse, FetchError>;
}

pub trait Clock {
    /// Current time in Unix seconds.
    fn now(&self) -> i64;
    fn sleep(&self, duration: Duration);
}

/// Blocking `reqwest` client sending `Authorization: token <credential>`.
pub struct HttpTransport {
    client: Client,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(token: Option<String>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, token })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<PageResponse, FetchError> {
        debug!(url, "GET");

        let mut request = self.client.get(url).header(ACCEPT, GITHUB_MEDIA_TYPE);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("token {token}"));
        }

        let response = request
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response.headers();
        let link = headers
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let rate_limit_reset = headers
            .get(RATE_LIMIT_RESET)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<i64>().ok());

        let body = response
            .text()
            .map_err(|e| FetchError::Transport(format!("failed to read response body: {e}")))?;

        Ok(PageResponse {
            status,
            link,
            rate_limit_reset,
            body,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
