//! Retry with exponential backoff

use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use super::GeneratorError;
use crate::config::GeneratorConfig;

/// Default number of attempts per generation
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default backoff base
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Bounded retry policy
///
/// After the n-th failed attempt the policy waits `base_delay * 2^n`, so the
/// defaults wait 2s, 4s, 8s and 16s between five attempts. Every error is
/// retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: config.backoff_base(),
        }
    }

    /// Wait after the `failed_attempt`-th failure, `None` once attempts are spent
    pub fn delay_after(&self, failed_attempt: u32) -> Option<Duration> {
        if failed_attempt == 0 || failed_attempt >= self.max_attempts {
            return None;
        }
        Some(self.base_delay.saturating_mul(2u32.saturating_pow(failed_attempt)))
    }

    /// Run `op` until it succeeds or the attempts are spent
    pub async fn run<T, F, Fut>(&self, operation: &str, mut op: F) -> Result<T, GeneratorError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, GeneratorError>>,
    {
        debug!(%operation, max_attempts = self.max_attempts, "run: called");
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op().await {
                Ok(value) => {
                    debug!(%operation, attempt, "run: success");
                    return Ok(value);
                }
                Err(e) => match self.delay_after(attempt) {
                    Some(backoff) => {
                        warn!(
                            %operation,
                            attempt,
                            backoff_ms = backoff.as_millis() as u64,
                            error = %e,
                            "run: attempt failed, retrying"
                        );
                        tokio::time::sleep(backoff).await;
                    }
                    None => {
                        warn!(%operation, attempts = attempt, error = %e, "run: giving up");
                        return Err(GeneratorError::Exhausted {
                            attempts: attempt,
                            last: Box::new(e),
                        });
                    }
                },
            }
        }
    }
}
