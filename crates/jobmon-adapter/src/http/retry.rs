/*
[INPUT]:  Fallible async request closures and retry limits
[OUTPUT]: Request results after exponential backoff with jitter
[POS]:    HTTP layer - retry policy shared by all GET routes
[UPDATE]: When changing backoff shape or retry classification
*/

use std::future::Future;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::warn;

use crate::http::{JobmonError, Result};

/// Exponential backoff with jitter, bounded by attempts and elapsed time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub max_elapsed: Duration,
    pub initial_backoff: Duration,
    pub exp_base: u32,
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            max_elapsed: Duration::from_secs(300),
            initial_backoff: Duration::from_secs(1),
            exp_base: 2,
            max_jitter: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no retries
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay before the retry that follows `attempt` (1-based), without jitter
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let factor = self.exp_base.max(1).saturating_pow(exponent);
        self.initial_backoff.saturating_mul(factor)
    }

    fn jitter(&self) -> Duration {
        let max_ms = self.max_jitter.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..=max_ms))
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// budget runs out.
    pub async fn run<T, F, Fut>(&self, route: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let started = Instant::now();
        let mut attempt = 1;
        loop {
            let err = match op().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            warn!(route, attempt, error = %err, "request attempt failed");

            if !err.is_retryable() {
                return Err(err);
            }
            if attempt >= self.max_attempts || started.elapsed() >= self.max_elapsed {
                if attempt == 1 {
                    return Err(err);
                }
                return Err(JobmonError::RetryBudgetExceeded {
                    attempts: attempt,
                    source: Box::new(err),
                });
            }

            let delay = self.backoff_for(attempt) + self.jitter();
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
