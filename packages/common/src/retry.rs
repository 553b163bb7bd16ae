use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::config::RetryConfig;

/// Errors that know whether another attempt could succeed.
pub trait Transient {
    fn is_transient(&self) -> bool;
}

/// Why a retried operation gave up.
#[derive(Debug)]
pub enum RetryFailure<E> {
    /// The operation failed with an error that must not be retried.
    Permanent(E),
    /// Every attempt failed with a transient error. Holds the last one.
    Exhausted { attempts: u32, last: E },
}

/// Calculate exponential backoff delay.
///
/// Formula: `min(base_ms * 2^(attempt-1), max_ms)`. Attempt numbers are 1-based,
/// so the delay after the first failure is exactly `base_ms`.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let exp_factor = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exp_factor).min(max_ms);
    Duration::from_millis(delay_ms)
}

/// Run `op` until it succeeds, fails permanently, or runs out of attempts.
///
/// Sleeps `calculate_backoff(attempt)` between attempts. There is no sleep
/// after the final attempt.
pub async fn retry_with_backoff<F, Fut, T, E>(
    policy: &RetryConfig,
    label: &str,
    mut op: F,
) -> Result<T, RetryFailure<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Transient + Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_transient() => return Err(RetryFailure::Permanent(e)),
            Err(e) if attempt >= max_attempts => {
                warn!(label, attempts = attempt, error = %e, "Giving up after retries");
                return Err(RetryFailure::Exhausted {
                    attempts: attempt,
                    last: e,
                });
            }
            Err(e) => {
                let delay = calculate_backoff(attempt, policy.base_delay_ms, policy.max_delay_ms);
                warn!(
                    label,
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Transient failure, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
