//! # Provider Retry Policy
//!
//! Embedding, chat and web-source requests share one policy. A request is
//! retried when it fails in transport or when the provider answers with a
//! rate-limit or transient gateway status (429, 500, 502, 503, 504). Other
//! statuses are returned to the caller on the first attempt.
//!
//! Delays double from `base_delay`. A `Retry-After` header given in seconds
//! replaces the computed delay, capped at [`MAX_RETRY_AFTER`].

use std::future::Future;
use std::time::Duration;

use reqwest::{header, Response, StatusCode};

/// Longest server-requested wait that is honoured.
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the initial request.
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    /// Three retries at 200ms, 400ms, 800ms.
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(200),
        }
    }
}

/// Statuses worth another attempt.
pub fn is_retryable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

fn retry_after(resp: &Response) -> Option<Duration> {
    let secs: u64 = resp
        .headers()
        .get(header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()?;
    Some(Duration::from_secs(secs).min(MAX_RETRY_AFTER))
}

impl RetryPolicy {
    /// No retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Send a request built by `f`, calling it up to `max_retries + 1` times.
    ///
    /// When every attempt answers with a retryable status, the last response
    /// is returned so the caller can report its status and body.
    pub async fn send<F, Fut>(&self, f: F) -> Result<Response, reqwest::Error>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<Response, reqwest::Error>>,
    {
        for attempt in 0..self.max_retries {
            let delay = match f().await {
                Ok(resp) if !is_retryable_status(resp.status()) => return Ok(resp),
                Ok(resp) => {
                    let delay = retry_after(&resp).unwrap_or_else(|| self.backoff(attempt));
                    tracing::warn!(
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        status = resp.status().as_u16(),
                        url = %resp.url(),
                        "provider asked to retry in {delay:?}"
                    );
                    delay
                }
                Err(e) => {
                    let delay = self.backoff(attempt);
                    tracing::warn!(
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        "provider request failed, retrying in {delay:?}: {e}"
                    );
                    delay
                }
            };
            tokio::time::sleep(delay).await;
        }
        f().await
    }
}
