//! Bounded retry execution with exponential backoff
//!
//! Runs a fallible async operation up to `max_attempts` times, waiting
//! `base_delay * 2^i` after the failed attempt with index `i`. The first
//! success is returned immediately. When every attempt fails, the error of
//! the last attempt is returned unchanged; earlier errors are only visible
//! to the configured `RetryObserver`.
//!
//! # Example
//!
//! ```rust,no_run
//! use rebound_core::retry::retry_with_policy;
//! use rebound_core::RetryPolicy;
//!
//! async fn example() -> Result<String, std::io::Error> {
//!     let policy = RetryPolicy::default();
//!
//!     retry_with_policy(&policy, || async {
//!         // Your fallible operation here
//!         Ok("success".to_string())
//!     }).await
//! }
//! ```

mod delay;
mod executor;
mod observer;
mod outcome;

pub use delay::{backoff_delay, delay_schedule, total_backoff};
pub use executor::{retry, retry_with_policy, RetryExecutor, RetryExecutorBuilder};
pub use observer::{NoOpObserver, RetryObserver, StatsObserver, TracingObserver};
pub use outcome::AttemptOutcome;
