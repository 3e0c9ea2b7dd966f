//! Upstream API error types.

use crate::RetryClass;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Structured error body returned by the payments API.
///
/// ```json
/// {
///   "error_code": "API_VALIDATION_ERROR",
///   "message": "amount must be a positive number",
///   "errors": [{"path": "amount", "message": "must be positive"}]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Upstream error code, e.g. `DUPLICATE_ERROR`
    #[serde(default)]
    pub error_code: String,
    /// Upstream message
    #[serde(default)]
    pub message: String,
    /// Field-level sub-errors, passed through as returned
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<serde_json::Value>,
}

impl ApiErrorBody {
    /// Parse an error body, falling back to the raw text as the message.
    ///
    /// # Examples
    ///
    /// ```
    /// use payline_error::ApiErrorBody;
    ///
    /// let body = ApiErrorBody::parse(br#"{"error_code":"NOT_FOUND","message":"gone"}"#);
    /// assert_eq!(body.error_code, "NOT_FOUND");
    ///
    /// let body = ApiErrorBody::parse(b"Bad Gateway");
    /// assert_eq!(body.message, "Bad Gateway");
    /// assert!(body.error_code.is_empty());
    /// ```
    pub fn parse(raw: &[u8]) -> Self {
        serde_json::from_slice(raw).unwrap_or_else(|_| Self {
            message: String::from_utf8_lossy(raw).trim().to_string(),
            ..Self::default()
        })
    }
}

/// Failure conditions reported by the request pipeline.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum ApiErrorKind {
    /// No response was received
    #[display("Network failure: {}", _0)]
    Network(String),
    /// HTTP 429 after the pipeline waited out the backoff
    #[display("Rate limited by upstream (waited {:?}): {}", backoff, body.message)]
    RateLimited {
        /// Delay the pipeline waited before surfacing the error
        backoff: Duration,
        /// Parsed error body
        body: ApiErrorBody,
    },
    /// Any other non-2xx response
    #[display("HTTP {} {}: {}", status, body.error_code, body.message)]
    Status {
        /// HTTP status code
        status: u16,
        /// Parsed error body
        body: ApiErrorBody,
    },
}

/// Error surfaced by the request pipeline, labelled with its [`RetryClass`].
///
/// # Examples
///
/// ```
/// use payline_error::{ApiError, ApiErrorBody, ApiErrorKind, RetryClass};
///
/// let err = ApiError::new(
///     ApiErrorKind::Status { status: 404, body: ApiErrorBody::default() },
///     RetryClass::Terminal,
/// );
/// assert_eq!(err.status(), Some(404));
/// assert_eq!(err.retry_class(), RetryClass::Terminal);
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("API Error ({}): {} at line {} in {}", retry_class, kind, line, file)]
pub struct ApiError {
    kind: ApiErrorKind,
    retry_class: RetryClass,
    line: u32,
    file: &'static str,
}

impl ApiError {
    /// Create a new API error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ApiErrorKind, retry_class: RetryClass) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            retry_class,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ApiErrorKind {
        &self.kind
    }

    /// Retryable/terminal marker assigned by the classifier.
    pub fn retry_class(&self) -> RetryClass {
        self.retry_class
    }

    /// HTTP status, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ApiErrorKind::Network(_) => None,
            ApiErrorKind::RateLimited { .. } => Some(429),
            ApiErrorKind::Status { status, .. } => Some(*status),
        }
    }

    /// Parsed upstream error body, if a response was received.
    pub fn body(&self) -> Option<&ApiErrorBody> {
        match &self.kind {
            ApiErrorKind::Network(_) => None,
            ApiErrorKind::RateLimited { body, .. } | ApiErrorKind::Status { body, .. } => {
                Some(body)
            }
        }
    }

    /// Upstream error code, if any.
    pub fn error_code(&self) -> Option<&str> {
        self.body()
            .map(|b| b.error_code.as_str())
            .filter(|code| !code.is_empty())
    }
}

impl crate::RetryableError for ApiError {
    fn is_retryable(&self) -> bool {
        self.retry_class.is_retryable()
    }

    fn retry_after(&self) -> Option<Duration> {
        match &self.kind {
            ApiErrorKind::RateLimited { backoff, .. } => Some(*backoff),
            _ => None,
        }
    }
}
