//! Retry classification markers.

/// Whether resubmitting a failed request could plausibly succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum RetryClass {
    /// Transient failure: network error, timeout, throttling or server-side fault.
    #[display("retryable")]
    Retryable,
    /// Permanent failure: resubmitting the same request will fail the same way.
    #[display("terminal")]
    Terminal,
}

impl RetryClass {
    /// Returns true for [`RetryClass::Retryable`].
    pub fn is_retryable(self) -> bool {
        matches!(self, RetryClass::Retryable)
    }
}

/// Trait for errors that support retry logic.
///
/// # Examples
///
/// ```
/// use payline_error::{ApiError, ApiErrorKind, RetryClass, RetryableError};
///
/// let err = ApiError::new(
///     ApiErrorKind::Network("connection reset".to_string()),
///     RetryClass::Retryable,
/// );
/// assert!(err.is_retryable());
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    ///
    /// Network failures and statuses such as 429 or 503 return true.
    /// Client errors such as 400 or 401, and local validation failures,
    /// return false.
    fn is_retryable(&self) -> bool;

    /// Server-provided delay before the next attempt, if any.
    fn retry_after(&self) -> Option<std::time::Duration> {
        None
    }
}
