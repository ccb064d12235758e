//! Retry configuration types
//!
//! A `RetryPolicy` fixes the two knobs of the executor: how many attempts to
//! make and the delay before the second attempt. Every later delay doubles
//! the previous one.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::error::{Error, Result};

/// Retry policies keyed by operation name, with a fallback default
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RetryConfig {
    /// Policy used when no operation-specific policy exists
    #[serde(default)]
    pub default: RetryPolicy,

    /// Per-operation retry policies
    #[serde(default)]
    pub operations: HashMap<String, RetryPolicy>,
}

impl RetryConfig {
    /// Policy for the named operation, falling back to the default
    pub fn policy_for(&self, operation: &str) -> &RetryPolicy {
        self.operations.get(operation).unwrap_or(&self.default)
    }

    /// Validate the default and every operation policy
    pub fn validate(&self) -> Result<()> {
        self.default
            .validate()
            .map_err(|e| Error::invalid_config(format!("default: {}", e)))?;

        for (name, policy) in &self.operations {
            policy
                .validate()
                .map_err(|e| Error::invalid_config(format!("operations.{}: {}", name, e)))?;
        }

        Ok(())
    }
}

/// Retry policy for an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the second attempt in milliseconds
    #[serde(default = "default_base_delay")]
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay(),
        }
    }
}

impl RetryPolicy {
    /// Create a validated policy
    ///
    /// The base delay must be a whole number of milliseconds, which is the
    /// resolution policies are stored and configured at.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Result<Self> {
        let policy = Self {
            max_attempts,
            base_delay_ms: whole_millis(base_delay)?,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Replace the attempt limit, rejecting zero
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Result<Self> {
        self.max_attempts = max_attempts;
        self.validate()?;
        Ok(self)
    }

    /// Replace the base delay, rejecting sub-millisecond precision
    pub fn with_base_delay(mut self, base_delay: Duration) -> Result<Self> {
        self.base_delay_ms = whole_millis(base_delay)?;
        Ok(self)
    }

    /// Delay before the second attempt
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    /// Check that the policy allows at least one attempt
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::invalid_config("max-attempts must be at least 1"));
        }
        Ok(())
    }
}

/// Convert a delay to milliseconds without dropping any part of it
fn whole_millis(delay: Duration) -> Result<u64> {
    if delay.subsec_nanos() % 1_000_000 != 0 {
        return Err(Error::invalid_config(format!(
            "base delay must be a whole number of milliseconds, got {:?}",
            delay
        )));
    }

    u64::try_from(delay.as_millis())
        .map_err(|_| Error::invalid_config(format!("base delay is too large: {:?}", delay)))
}

fn default_max_attempts() -> u32 {
    3
}
fn default_base_delay() -> u64 {
    500
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_policy_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_omitted_fields_match_defaults() {
        let policy: RetryPolicy = serde_yaml_ng::from_str("{}").unwrap();
        assert_eq!(policy, RetryPolicy::default());

        let policy: RetryPolicy = serde_yaml_ng::from_str("max-attempts: 7").unwrap();
        assert_eq!(policy.max_attempts, 7);
        assert_eq!(policy.base_delay_ms, 500);

        let policy: RetryPolicy = serde_yaml_ng::from_str("base-delay-ms: 20").unwrap();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay_ms, 20);
    }

    #[test]
    fn test_new_rejects_zero_attempts() {
        let result = RetryPolicy::new(0, Duration::from_millis(100));
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn test_new_accepts_zero_delay() {
        let policy = RetryPolicy::new(1, Duration::ZERO).unwrap();
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.base_delay(), Duration::ZERO);
    }

    #[test]
    fn test_builder_style_setters() {
        let policy = RetryPolicy::default()
            .with_max_attempts(5)
            .and_then(|p| p.with_base_delay(Duration::from_millis(40)))
            .unwrap();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.base_delay_ms, 40);
    }

    #[test]
    fn test_with_max_attempts_rejects_zero() {
        let result = RetryPolicy::default().with_max_attempts(0);
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn test_sub_millisecond_base_delay_rejected() {
        for delay in [Duration::from_micros(500), Duration::from_micros(1500)] {
            let result = RetryPolicy::new(3, delay);
            assert!(
                matches!(result, Err(Error::InvalidConfig { .. })),
                "{:?} should be rejected",
                delay
            );

            let result = RetryPolicy::default().with_base_delay(delay);
            assert!(matches!(result, Err(Error::InvalidConfig { .. })));
        }
    }

    #[test]
    fn test_whole_millisecond_base_delay_kept_exactly() {
        let policy = RetryPolicy::new(3, Duration::from_secs(2)).unwrap();
        assert_eq!(policy.base_delay(), Duration::from_secs(2));

        let policy = RetryPolicy::new(3, Duration::from_millis(1)).unwrap();
        assert_eq!(policy.base_delay(), Duration::from_millis(1));
    }

    #[test]
    fn test_oversized_base_delay_rejected() {
        let result = RetryPolicy::new(3, Duration::new(u64::MAX, 0));
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn test_policy_serialization_is_kebab_case() {
        let yaml = serde_yaml_ng::to_string(&RetryPolicy::default()).unwrap();
        assert!(yaml.contains("max-attempts: 3"));
        assert!(yaml.contains("base-delay-ms: 500"));
    }

    #[test]
    fn test_policy_for_falls_back_to_default() {
        let mut config = RetryConfig::default();
        config.operations.insert(
            "upload".to_string(),
            RetryPolicy {
                max_attempts: 5,
                base_delay_ms: 100,
            },
        );

        assert_eq!(config.policy_for("upload").max_attempts, 5);
        assert_eq!(config.policy_for("unknown"), &RetryPolicy::default());
    }

    #[test]
    fn test_validate_names_offending_operation() {
        let mut config = RetryConfig::default();
        config.operations.insert(
            "broken".to_string(),
            RetryPolicy {
                max_attempts: 0,
                base_delay_ms: 100,
            },
        );

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("operations.broken"));
    }
}
