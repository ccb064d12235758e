//! Retry observation and logging
//!
//! This module provides the `RetryObserver` trait for reporting retry attempts
//! and a `TracingObserver` implementation that logs using the `tracing` crate.

use std::fmt::Display;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Observer trait for retry attempt events
///
/// Implement this trait to receive callbacks during retry execution.
/// Errors are passed as `&dyn Display` so any error type can be reported,
/// including ones that do not implement `std::error::Error`.
///
/// # Example
///
/// ```rust
/// use rebound_core::retry::RetryObserver;
/// use std::fmt::Display;
/// use std::time::Duration;
///
/// struct MetricsObserver {
///     // Your metrics client here
/// }
///
/// impl RetryObserver for MetricsObserver {
///     fn on_attempt_failed(
///         &self,
///         attempt: u32,
///         max_attempts: u32,
///         error: &dyn Display,
///         next_delay: Option<Duration>,
///     ) {
///         // Record failure metric
///     }
///
///     fn on_exhausted(&self, attempts: u32, final_error: &dyn Display) {
///         // Record exhaustion metric
///     }
/// }
/// ```
pub trait RetryObserver: Send + Sync {
    /// Called when an attempt is about to start
    ///
    /// # Arguments
    ///
    /// * `attempt` - The attempt number (1-indexed)
    /// * `max_attempts` - The maximum number of attempts configured
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        let _ = (attempt, max_attempts);
    }

    /// Called for every failed attempt, including the last one
    ///
    /// # Arguments
    ///
    /// * `attempt` - The attempt number that failed (1-indexed)
    /// * `max_attempts` - The maximum number of attempts configured
    /// * `error` - The error that caused the failure
    /// * `next_delay` - The wait before the next attempt, `None` after the last attempt
    fn on_attempt_failed(
        &self,
        attempt: u32,
        max_attempts: u32,
        error: &dyn Display,
        next_delay: Option<Duration>,
    );

    /// Called when the operation succeeds
    ///
    /// # Arguments
    ///
    /// * `attempt` - The attempt number that succeeded (1-indexed)
    /// * `total_duration` - Total time spent across all attempts
    fn on_success(&self, attempt: u32, total_duration: Duration) {
        let _ = (attempt, total_duration);
    }

    /// Called once when all attempts are exhausted, before the error is returned
    ///
    /// # Arguments
    ///
    /// * `attempts` - Total number of attempts made
    /// * `final_error` - The error from the final attempt
    fn on_exhausted(&self, attempts: u32, final_error: &dyn Display);
}

/// A no-op observer that does nothing
///
/// Use this when you don't need observation but the API requires an observer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl RetryObserver for NoOpObserver {
    fn on_attempt_failed(
        &self,
        _attempt: u32,
        _max_attempts: u32,
        _error: &dyn Display,
        _next_delay: Option<Duration>,
    ) {
    }

    fn on_exhausted(&self, _attempts: u32, _final_error: &dyn Display) {}
}

/// An observer that logs retry events using the `tracing` crate
///
/// # Log Levels
///
/// - `on_attempt_start`: DEBUG
/// - `on_attempt_failed`: WARN
/// - `on_success`: INFO (if > 1 attempt) or DEBUG (first attempt)
/// - `on_exhausted`: ERROR
///
/// # Example
///
/// ```rust
/// use rebound_core::retry::TracingObserver;
///
/// // Create with operation name for better log context
/// let observer = TracingObserver::new("upload");
/// ```
#[derive(Debug, Clone)]
pub struct TracingObserver {
    /// Name of the operation being retried (for log context)
    operation: String,
}

impl TracingObserver {
    /// Create a new tracing observer
    ///
    /// # Arguments
    ///
    /// * `operation` - A descriptive name for the operation being retried
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }

    /// Get the operation name
    pub fn operation(&self) -> &str {
        &self.operation
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new("retry")
    }
}

impl RetryObserver for TracingObserver {
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        tracing::debug!(
            operation = %self.operation,
            attempt = attempt,
            max_attempts = max_attempts,
            "starting attempt"
        );
    }

    fn on_attempt_failed(
        &self,
        attempt: u32,
        max_attempts: u32,
        error: &dyn Display,
        next_delay: Option<Duration>,
    ) {
        match next_delay {
            Some(delay) => tracing::warn!(
                operation = %self.operation,
                attempt = attempt,
                max_attempts = max_attempts,
                error = %error,
                delay_ms = delay.as_millis() as u64,
                "attempt failed, will retry"
            ),
            None => tracing::warn!(
                operation = %self.operation,
                attempt = attempt,
                max_attempts = max_attempts,
                error = %error,
                "attempt failed"
            ),
        }
    }

    fn on_success(&self, attempt: u32, total_duration: Duration) {
        if attempt > 1 {
            tracing::info!(
                operation = %self.operation,
                attempt = attempt,
                total_duration_ms = total_duration.as_millis() as u64,
                "succeeded after retry"
            );
        } else {
            tracing::debug!(
                operation = %self.operation,
                duration_ms = total_duration.as_millis() as u64,
                "succeeded on first attempt"
            );
        }
    }

    fn on_exhausted(&self, attempts: u32, final_error: &dyn Display) {
        tracing::error!(
            operation = %self.operation,
            attempts = attempts,
            error = %final_error,
            "all retry attempts exhausted"
        );
    }
}

/// An observer that collects statistics about retry attempts
///
/// Useful for testing and metrics collection.
#[derive(Debug, Default)]
pub struct StatsObserver {
    /// Attempt start events
    pub attempt_starts: AtomicU32,
    /// Failed attempt events
    pub failures: AtomicU32,
    /// Success events
    pub successes: AtomicU32,
    /// Exhaustion events
    pub exhaustions: AtomicU32,
    /// Ordinal of the most recent failed attempt, 0 if none failed
    pub last_failed_attempt: AtomicU32,
}

impl StatsObserver {
    /// Create a new stats observer
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of attempt starts
    pub fn attempt_starts(&self) -> u32 {
        self.attempt_starts.load(Ordering::SeqCst)
    }

    /// Get the number of failures
    pub fn failures(&self) -> u32 {
        self.failures.load(Ordering::SeqCst)
    }

    /// Get the number of successes
    pub fn successes(&self) -> u32 {
        self.successes.load(Ordering::SeqCst)
    }

    /// Get the number of exhaustions
    pub fn exhaustions(&self) -> u32 {
        self.exhaustions.load(Ordering::SeqCst)
    }

    /// Get the ordinal of the most recent failed attempt
    pub fn last_failed_attempt(&self) -> u32 {
        self.last_failed_attempt.load(Ordering::SeqCst)
    }
}

impl RetryObserver for StatsObserver {
    fn on_attempt_start(&self, _attempt: u32, _max_attempts: u32) {
        self.attempt_starts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_attempt_failed(
        &self,
        attempt: u32,
        _max_attempts: u32,
        _error: &dyn Display,
        _next_delay: Option<Duration>,
    ) {
        self.failures.fetch_add(1, Ordering::SeqCst);
        self.last_failed_attempt.store(attempt, Ordering::SeqCst);
    }

    fn on_success(&self, _attempt: u32, _total_duration: Duration) {
        self.successes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_exhausted(&self, _attempts: u32, _final_error: &dyn Display) {
        self.exhaustions.fetch_add(1, Ordering::SeqCst);
    }
}

/// Implement RetryObserver for Arc<T> where T: RetryObserver
impl<T: RetryObserver + ?Sized> RetryObserver for std::sync::Arc<T> {
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        (**self).on_attempt_start(attempt, max_attempts)
    }

    fn on_attempt_failed(
        &self,
        attempt: u32,
        max_attempts: u32,
        error: &dyn Display,
        next_delay: Option<Duration>,
    ) {
        (**self).on_attempt_failed(attempt, max_attempts, error, next_delay)
    }

    fn on_success(&self, attempt: u32, total_duration: Duration) {
        (**self).on_success(attempt, total_duration)
    }

    fn on_exhausted(&self, attempts: u32, final_error: &dyn Display) {
        (**self).on_exhausted(attempts, final_error)
    }
}

/// Implement RetryObserver for Box<T> where T: RetryObserver
impl<T: RetryObserver + ?Sized> RetryObserver for Box<T> {
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        (**self).on_attempt_start(attempt, max_attempts)
    }

    fn on_attempt_failed(
        &self,
        attempt: u32,
        max_attempts: u32,
        error: &dyn Display,
        next_delay: Option<Duration>,
    ) {
        (**self).on_attempt_failed(attempt, max_attempts, error, next_delay)
    }

    fn on_success(&self, attempt: u32, total_duration: Duration) {
        (**self).on_success(attempt, total_duration)
    }

    fn on_exhausted(&self, attempts: u32, final_error: &dyn Display) {
        (**self).on_exhausted(attempts, final_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_noop_observer() {
        let observer = NoOpObserver;
        let error = io::Error::other("test");

        // These should all be no-ops
        observer.on_attempt_start(1, 3);
        observer.on_attempt_failed(1, 3, &error, Some(Duration::from_millis(100)));
        observer.on_success(2, Duration::from_millis(500));
        observer.on_exhausted(3, &error);
    }

    #[test]
    fn test_stats_observer() {
        let observer = StatsObserver::new();
        let error = io::Error::other("test");

        observer.on_attempt_start(1, 3);
        observer.on_attempt_failed(1, 3, &error, Some(Duration::from_millis(100)));
        observer.on_attempt_start(2, 3);
        observer.on_success(2, Duration::from_millis(500));

        assert_eq!(observer.attempt_starts(), 2);
        assert_eq!(observer.failures(), 1);
        assert_eq!(observer.successes(), 1);
        assert_eq!(observer.exhaustions(), 0);
        assert_eq!(observer.last_failed_attempt(), 1);
    }

    #[test]
    fn test_stats_observer_exhaustion() {
        let observer = StatsObserver::new();
        let error = "plain string errors are reportable too";

        observer.on_attempt_start(1, 2);
        observer.on_attempt_failed(1, 2, &error, Some(Duration::from_millis(100)));
        observer.on_attempt_start(2, 2);
        observer.on_attempt_failed(2, 2, &error, None);
        observer.on_exhausted(2, &error);

        assert_eq!(observer.attempt_starts(), 2);
        assert_eq!(observer.failures(), 2);
        assert_eq!(observer.exhaustions(), 1);
        assert_eq!(observer.last_failed_attempt(), 2);
    }

    #[test]
    fn test_tracing_observer_creation() {
        let observer = TracingObserver::new("test_operation");
        assert_eq!(observer.operation(), "test_operation");

        let default_observer = TracingObserver::default();
        assert_eq!(default_observer.operation(), "retry");
    }

    #[test]
    fn test_boxed_observer() {
        let stats = std::sync::Arc::new(StatsObserver::new());
        let boxed: Box<dyn RetryObserver> = Box::new(stats.clone());

        boxed.on_attempt_start(1, 1);
        boxed.on_attempt_failed(1, 1, &"down", None);
        boxed.on_exhausted(1, &"down");

        assert_eq!(stats.attempt_starts(), 1);
        assert_eq!(stats.failures(), 1);
        assert_eq!(stats.exhaustions(), 1);
    }
}
