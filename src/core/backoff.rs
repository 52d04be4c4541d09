//! Retry backoff and the sleep seam used by every pipeline wait.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

/// Exponential backoff with additive jitter and a hard cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Base delay, doubled per attempt.
    pub initial_delay: Duration,
    /// Upper bound on any computed delay.
    pub max_delay: Duration,
    /// Jitter is drawn uniformly from `[0, max_jitter)`.
    pub max_jitter: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10_000),
            max_jitter: Duration::from_millis(1000),
        }
    }
}

impl BackoffPolicy {
    /// Delay before retry number `attempt`, with a random jitter.
    #[must_use]
    pub fn compute_delay(&self, attempt: u32) -> Duration {
        let jitter = if self.max_jitter.is_zero() {
            Duration::ZERO
        } else {
            rand::thread_rng().gen_range(Duration::ZERO..self.max_jitter)
        };
        self.delay_with_jitter(attempt, jitter)
    }

    /// `min(initial_delay * 2^attempt + jitter, max_delay)`.
    #[must_use]
    pub fn delay_with_jitter(&self, attempt: u32, jitter: Duration) -> Duration {
        let factor = 2_u32.checked_pow(attempt).unwrap_or(u32::MAX);
        let exponential = self.initial_delay.saturating_mul(factor);
        exponential.saturating_add(jitter).min(self.max_delay)
    }
}

/// Performs the waits between retries and pages.
///
/// Production code sleeps on the tokio timer; tests substitute a recorder so
/// delays can be counted without spending wall-clock time.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}
