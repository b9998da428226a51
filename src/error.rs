/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Non-success HTTP status that was not retried, or retries ran out.
    #[error("http error {status} {status_text}")]
    Http {
        status: u16,
        /// Canonical reason phrase for `status`, empty when unknown.
        status_text: String,
        /// Raw upstream response body.
        body: String,
    },
    /// Missing or invalid configuration, detected before any request is sent.
    #[error("configuration error: {0}")]
    Config(String),
    /// Upstream body could not be decoded into the provider's response shape.
    #[error("decode error: {0}")]
    Decode(String),
}

impl RelayError {
    /// Returns the HTTP status for [`RelayError::Http`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
