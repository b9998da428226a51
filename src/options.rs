/// Configures per-request timeout and retry behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RetryOptions {
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Total number of requests allowed, including the first one.
    pub max_attempts: usize,
    /// Delay before the second attempt; doubled for every attempt after that.
    pub base_delay_ms: u64,
    /// Exclusive upper bound of the random jitter added to each delay.
    pub max_jitter_ms: u64,
}

impl RetryOptions {
    /// One request, no retries. Used by the prompt relay route.
    pub fn single_attempt() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            max_attempts: 5,
            base_delay_ms: 1_000,
            max_jitter_ms: 1_000,
        }
    }
}
