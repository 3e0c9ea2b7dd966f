//! Retry policy and failure classification.

use crate::RetryConfig;
use payline_error::RetryClass;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

/// Status codes treated as transient when the caller does not configure any.
pub const DEFAULT_RETRYABLE_STATUS_CODES: [u16; 6] = [408, 429, 500, 502, 503, 504];

/// Immutable retry settings.
///
/// The pipeline uses `base_delay` as the fallback backoff for a 429 without a
/// `retry-after` header. The caller-side retry loop uses all of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct RetryPolicy {
    /// Resubmissions allowed after the first attempt
    max_retries: u32,
    /// First backoff delay
    base_delay: Duration,
    /// Ceiling for any single backoff delay
    max_delay: Duration,
    /// Statuses classified as retryable
    retryable_status_codes: BTreeSet<u16>,
}

impl RetryPolicy {
    /// Create a policy.
    pub fn new(
        max_retries: u32,
        base_delay: Duration,
        max_delay: Duration,
        retryable_status_codes: impl IntoIterator<Item = u16>,
    ) -> Self {
        Self {
            max_retries,
            base_delay,
            max_delay: max_delay.max(base_delay),
            retryable_status_codes: retryable_status_codes.into_iter().collect(),
        }
    }

    /// Build a policy from the `[retry]` configuration section.
    pub fn from_config(config: &RetryConfig) -> Self {
        let codes = if config.retryable_status_codes.is_empty() {
            DEFAULT_RETRYABLE_STATUS_CODES.to_vec()
        } else {
            config.retryable_status_codes.clone()
        };
        Self::new(
            config.max_retries,
            Duration::from_millis(config.base_delay_ms),
            Duration::from_millis(config.max_delay_ms),
            codes,
        )
    }

    /// Whether `status` is in the retryable set.
    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retryable_status_codes.contains(&status)
    }

    /// Un-jittered delay before retry number `attempt` (1-based): the base
    /// delay doubled per attempt, capped at `max_delay`.
    ///
    /// # Examples
    ///
    /// ```
    /// use payline_rate_limit::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::default();
    /// assert_eq!(policy.backoff_for(1), Duration::from_secs(1));
    /// assert_eq!(policy.backoff_for(3), Duration::from_secs(4));
    /// assert_eq!(policy.backoff_for(10), Duration::from_secs(30));
    /// ```
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.base_delay
            .saturating_mul(1u32 << exponent)
            .min(self.max_delay)
    }

    /// The full backoff schedule, one delay per allowed retry.
    pub fn schedule(&self) -> impl Iterator<Item = Duration> + '_ {
        (1..=self.max_retries).map(|attempt| self.backoff_for(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            3,
            Duration::from_millis(1000),
            Duration::from_millis(30_000),
            DEFAULT_RETRYABLE_STATUS_CODES,
        )
    }
}

/// Labels failed requests as retryable or terminal.
///
/// The label depends only on the status (or its absence) and the policy, so
/// the same input always yields the same class.
///
/// # Examples
///
/// ```
/// use payline_error::RetryClass;
/// use payline_rate_limit::{RetryClassifier, RetryPolicy};
///
/// let classifier = RetryClassifier::new(RetryPolicy::default());
/// assert_eq!(classifier.classify(None), RetryClass::Retryable);
/// assert_eq!(classifier.classify(Some(503)), RetryClass::Retryable);
/// assert_eq!(classifier.classify(Some(404)), RetryClass::Terminal);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RetryClassifier {
    policy: RetryPolicy,
}

impl RetryClassifier {
    /// Create a classifier for `policy`.
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// The policy this classifier applies.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Classify a failure. `None` means no response was received.
    pub fn classify(&self, status: Option<u16>) -> RetryClass {
        match status {
            None => RetryClass::Retryable,
            Some(code) if self.policy.is_retryable_status(code) => RetryClass::Retryable,
            Some(_) => RetryClass::Terminal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_codes() {
        let classifier = RetryClassifier::default();
        for code in DEFAULT_RETRYABLE_STATUS_CODES {
            assert_eq!(classifier.classify(Some(code)), RetryClass::Retryable);
        }
        for code in [400, 401, 403, 404, 409, 422, 501] {
            assert_eq!(classifier.classify(Some(code)), RetryClass::Terminal);
        }
    }

    #[test]
    fn test_custom_codes_replace_defaults() {
        let policy = RetryPolicy::new(1, Duration::from_millis(10), Duration::from_millis(10), [409]);
        let classifier = RetryClassifier::new(policy);
        assert_eq!(classifier.classify(Some(409)), RetryClass::Retryable);
        assert_eq!(classifier.classify(Some(503)), RetryClass::Terminal);
        assert_eq!(classifier.classify(None), RetryClass::Retryable);
    }

    #[test]
    fn test_schedule_doubles_and_caps() {
        let policy = RetryPolicy::new(
            5,
            Duration::from_millis(100),
            Duration::from_millis(500),
            DEFAULT_RETRYABLE_STATUS_CODES,
        );
        let delays: Vec<u64> = policy.schedule().map(|d| d.as_millis() as u64).collect();
        assert_eq!(delays, vec![100, 200, 400, 500, 500]);
    }

    #[test]
    fn test_zero_retries_has_empty_schedule() {
        let policy = RetryPolicy::new(0, Duration::from_millis(100), Duration::from_secs(1), []);
        assert_eq!(policy.schedule().count(), 0);
    }
}
