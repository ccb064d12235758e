//! # rebound-core
//!
//! Core library for rebound providing:
//! - Bounded retry execution with exponential backoff
//! - Pluggable reporting of failed attempts via `RetryObserver`
//! - Retry policy types and hierarchical configuration loading

pub mod config;
pub mod error;
pub mod retry;
pub mod types;

pub use config::ConfigLoader;
pub use error::{Error, Result};
pub use types::{RetryConfig, RetryPolicy};
