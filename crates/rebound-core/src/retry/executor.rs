//! Retry execution engine
//!
//! This module provides the attempt loop: invoke, report, back off, repeat.

use std::fmt::Display;
use std::future::Future;

use tokio::time::Instant;

use crate::types::RetryPolicy;

use super::delay::backoff_delay;
use super::observer::{NoOpObserver, RetryObserver, TracingObserver};
use super::outcome::AttemptOutcome;

/// Execute an async operation with the default policy (3 attempts, 500ms)
///
/// Failed attempts are logged through a `TracingObserver`.
pub async fn retry<F, Fut, T, E>(op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    retry_with_policy(&RetryPolicy::default(), op).await
}

/// Execute an async operation with retry logic based on a policy
///
/// This is a convenience function for simple retry scenarios. For a custom
/// reporting sink, use `RetryExecutorBuilder`.
///
/// # Arguments
///
/// * `policy` - The retry policy to use
/// * `op` - A closure that returns a future representing the operation
///
/// # Returns
///
/// The result of the first successful attempt, or the error of the last
/// attempt if all of them fail.
///
/// # Example
///
/// ```rust,no_run
/// use rebound_core::retry::retry_with_policy;
/// use rebound_core::RetryPolicy;
///
/// async fn example() {
///     let policy = RetryPolicy::default();
///
///     let result = retry_with_policy(&policy, || async {
///         // Simulated operation that might fail
///         Ok::<_, std::io::Error>("success")
///     }).await;
/// }
/// ```
pub async fn retry_with_policy<F, Fut, T, E>(policy: &RetryPolicy, op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    RetryExecutorBuilder::new()
        .with_policy(*policy)
        .with_observer(TracingObserver::default())
        .build()
        .execute(op)
        .await
}

/// Builder for configuring a `RetryExecutor`
///
/// # Example
///
/// ```rust
/// use rebound_core::retry::{RetryExecutorBuilder, TracingObserver};
/// use rebound_core::RetryPolicy;
///
/// let executor = RetryExecutorBuilder::new()
///     .with_policy(RetryPolicy::default())
///     .with_observer(TracingObserver::new("upload"))
///     .build();
/// ```
pub struct RetryExecutorBuilder<O = NoOpObserver> {
    policy: RetryPolicy,
    observer: O,
}

impl Default for RetryExecutorBuilder<NoOpObserver> {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryExecutorBuilder<NoOpObserver> {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            policy: RetryPolicy::default(),
            observer: NoOpObserver,
        }
    }
}

impl<O> RetryExecutorBuilder<O> {
    /// Set the retry policy
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the observer
    ///
    /// The observer receives callbacks during retry execution.
    pub fn with_observer<O2>(self, observer: O2) -> RetryExecutorBuilder<O2> {
        RetryExecutorBuilder {
            policy: self.policy,
            observer,
        }
    }

    /// Build the executor
    pub fn build(self) -> RetryExecutor<O> {
        RetryExecutor {
            policy: self.policy,
            observer: self.observer,
        }
    }
}

/// A retry executor with a fixed policy and reporting observer
///
/// The executor holds no per-invocation state, so one instance can drive any
/// number of concurrent `execute` calls.
#[derive(Debug, Clone)]
pub struct RetryExecutor<O = NoOpObserver> {
    policy: RetryPolicy,
    observer: O,
}

impl Default for RetryExecutor<NoOpObserver> {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

impl RetryExecutor<NoOpObserver> {
    /// Create an executor that reports nothing
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            observer: NoOpObserver,
        }
    }
}

impl<O> RetryExecutor<O>
where
    O: RetryObserver,
{
    /// The policy this executor runs with
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// The observer receiving attempt reports
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Execute an operation with retry logic
    ///
    /// Attempts run strictly one after another. A policy with
    /// `max_attempts == 0` still makes one attempt.
    ///
    /// # Arguments
    ///
    /// * `op` - A closure that returns a future representing the operation
    ///
    /// # Returns
    ///
    /// The value of the first successful attempt, or the unmodified error of
    /// the final attempt.
    pub async fn execute<F, Fut, T, E>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let start = Instant::now();
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt_index = 0;

        loop {
            match self.run_attempt(&mut op, attempt_index).await {
                AttemptOutcome::Success(value) => {
                    self.observer.on_success(attempt_index + 1, start.elapsed());
                    return Ok(value);
                }
                AttemptOutcome::Failure { error, .. } => {
                    let attempt = attempt_index + 1;

                    if attempt >= max_attempts {
                        self.observer
                            .on_attempt_failed(attempt, max_attempts, &error, None);
                        self.observer.on_exhausted(attempt, &error);
                        return Err(error);
                    }

                    let delay = backoff_delay(&self.policy, attempt_index);
                    self.observer
                        .on_attempt_failed(attempt, max_attempts, &error, Some(delay));

                    // Wait before next attempt
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }

            attempt_index += 1;
        }
    }

    /// Run a single attempt of the operation
    ///
    /// Reports the attempt start and converts the result into an
    /// `AttemptOutcome` tagged with `attempt_index`.
    pub async fn run_attempt<F, Fut, T, E>(
        &self,
        op: &mut F,
        attempt_index: u32,
    ) -> AttemptOutcome<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.observer
            .on_attempt_start(attempt_index + 1, self.policy.max_attempts.max(1));

        AttemptOutcome::from_result(op().await, attempt_index)
    }
}
