use std::fmt;

use reqwest::{header::HeaderMap, Method};

/// Outbound request handed to [`crate::RetryingCaller`].
///
/// The caller never looks inside `body`; it is serialized as JSON on every
/// attempt.
#[derive(Clone)]
pub struct UpstreamRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
}

impl UpstreamRequest {
    /// Creates a `POST` request with a JSON body.
    pub fn post_json(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            headers: HeaderMap::new(),
            body: Some(body),
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}

impl fmt::Debug for UpstreamRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Query strings may carry API keys.
        let url = self.url.split('?').next().unwrap_or_default();
        f.debug_struct("UpstreamRequest")
            .field("method", &self.method)
            .field("url", &url)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}
