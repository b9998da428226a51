use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, StatusCode};

use crate::{
    backoff::{backoff_delay, Sleeper, TokioSleeper},
    RelayError, Result, RetryOptions, UpstreamRequest,
};

/// Sends [`UpstreamRequest`]s with bounded exponential backoff.
///
/// Only `429 Too Many Requests` is retried by status; every transport error
/// is retried. Both share the same attempt ceiling.
#[derive(Clone)]
pub struct RetryingCaller {
    http: reqwest::Client,
    options: RetryOptions,
    sleeper: Arc<dyn Sleeper>,
}

impl fmt::Debug for RetryingCaller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryingCaller")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Default for RetryingCaller {
    fn default() -> Self {
        Self::new(RetryOptions::default())
    }
}

impl RetryingCaller {
    pub fn new(options: RetryOptions) -> Self {
        Self::with_client(reqwest::Client::new(), options)
    }

    /// Reuses an existing `reqwest::Client` and its connection pool.
    pub fn with_client(http: reqwest::Client, options: RetryOptions) -> Self {
        Self {
            http,
            options,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Replaces the sleeper used between attempts.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn options(&self) -> &RetryOptions {
        &self.options
    }

    /// Sends `request` until it succeeds, fails terminally, or the attempt
    /// ceiling is reached.
    ///
    /// The successful response is returned with its body unread.
    pub async fn send(&self, request: &UpstreamRequest) -> Result<reqwest::Response> {
        let max_attempts = self.options.max_attempts;
        if max_attempts == 0 {
            return Err(RelayError::Config(
                "max_attempts must be at least 1".to_owned(),
            ));
        }

        let mut attempt = 0usize;
        loop {
            let is_last = attempt + 1 >= max_attempts;

            match self.build(request).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }

                    if should_retry_status(status) && !is_last {
                        self.wait_before_retry(attempt).await;
                        attempt += 1;
                        continue;
                    }

                    let body = match response.text().await {
                        Ok(body) => body,
                        Err(_err) => {
                            #[cfg(feature = "tracing")]
                            tracing::debug!(error = %_err, "could not read upstream error body");
                            String::new()
                        }
                    };
                    return Err(RelayError::Http {
                        status: status.as_u16(),
                        status_text: status.canonical_reason().unwrap_or_default().to_owned(),
                        body,
                    });
                }
                Err(err) => {
                    if is_last {
                        return Err(RelayError::Transport(err));
                    }

                    #[cfg(feature = "tracing")]
                    tracing::debug!(attempt, error = %err, "transport failure, will retry");

                    self.wait_before_retry(attempt).await;
                    attempt += 1;
                }
            }
        }
    }

    fn build(&self, request: &UpstreamRequest) -> reqwest::RequestBuilder {
        let mut builder = self
            .http
            .request(request.method.clone(), &request.url)
            .headers(request.headers.clone())
            .timeout(Duration::from_millis(self.options.timeout_ms));
        if let Some(body) = &request.body {
            builder = builder
                .header(header::CONTENT_TYPE, "application/json")
                .json(body);
        }
        builder
    }

    async fn wait_before_retry(&self, attempt: usize) {
        let delay = backoff_delay(&self.options, attempt, &mut rand::rng());

        #[cfg(feature = "tracing")]
        tracing::debug!(
            attempt,
            delay_ms = delay.as_millis() as u64,
            "retrying upstream request"
        );

        self.sleeper.sleep(delay).await;
    }
}

fn should_retry_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
}
