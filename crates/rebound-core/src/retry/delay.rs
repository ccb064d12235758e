//! Backoff delay computation
//!
//! Delays double with every failed attempt and carry no jitter or cap, so a
//! policy fully determines its schedule.

use std::time::Duration;

use crate::types::RetryPolicy;

/// Delay to wait after the failed attempt with the given 0-based index
///
/// Computes `base_delay * 2^attempt_index`, saturating at `Duration::MAX`.
///
/// # Example
///
/// ```rust
/// use rebound_core::retry::backoff_delay;
/// use rebound_core::RetryPolicy;
///
/// let policy = RetryPolicy { max_attempts: 4, base_delay_ms: 100 };
///
/// assert_eq!(backoff_delay(&policy, 0).as_millis(), 100);
/// assert_eq!(backoff_delay(&policy, 1).as_millis(), 200);
/// assert_eq!(backoff_delay(&policy, 2).as_millis(), 400);
/// ```
pub fn backoff_delay(policy: &RetryPolicy, attempt_index: u32) -> Duration {
    let base = policy.base_delay();
    if base.is_zero() {
        return Duration::ZERO;
    }

    2u32.checked_pow(attempt_index)
        .map(|factor| base.saturating_mul(factor))
        .unwrap_or(Duration::MAX)
}

/// The waits of a fully exhausted run, in order
///
/// One entry per gap between attempts, so `max_attempts - 1` entries. No wait
/// follows the final attempt.
pub fn delay_schedule(policy: &RetryPolicy) -> Vec<Duration> {
    (0..policy.max_attempts.saturating_sub(1))
        .map(|index| backoff_delay(policy, index))
        .collect()
}

/// Total time suspended by a fully exhausted run
pub fn total_backoff(policy: &RetryPolicy) -> Duration {
    delay_schedule(policy)
        .into_iter()
        .fold(Duration::ZERO, Duration::saturating_add)
}
