use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use rand::Rng;

use crate::RetryOptions;

/// Computes the wait before attempt `attempt + 1`.
///
/// `base * 2^attempt + U[0, max_jitter)`. The doubling is uncapped; only the
/// attempt ceiling bounds it, so arithmetic saturates rather than wrapping.
pub fn backoff_delay<R: Rng>(options: &RetryOptions, attempt: usize, rng: &mut R) -> Duration {
    let exp = attempt.min(63) as u32;
    let multiplier = 1u64 << exp;
    let base = options.base_delay_ms.saturating_mul(multiplier);
    let jitter = if options.max_jitter_ms == 0 {
        0
    } else {
        rng.random_range(0..options.max_jitter_ms)
    };
    Duration::from_millis(base.saturating_add(jitter))
}

/// Suspends the calling task between attempts.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, delay: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}

/// Default sleeper backed by `tokio::time::sleep`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, delay: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(tokio::time::sleep(delay))
    }
}
