//! Top-level error wrapper types.

use crate::{ApiError, ConfigError, HttpError, JsonError, RetryableError, ValidationError, WebhookError};

/// Every failure a Payline operation can produce.
///
/// # Examples
///
/// ```
/// use payline_error::{PaylineError, HttpError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: PaylineError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum PaylineErrorKind {
    /// Transport error before a response was received
    #[from(HttpError)]
    Http(HttpError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Local request validation error
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Upstream API error, labelled retryable or terminal
    #[from(ApiError)]
    Api(ApiError),
    /// Webhook verification error
    #[from(WebhookError)]
    Webhook(WebhookError),
}

/// Payline error with kind discrimination.
///
/// # Examples
///
/// ```
/// use payline_error::{PaylineError, PaylineResult, ValidationError};
///
/// fn might_fail() -> PaylineResult<()> {
///     Err(ValidationError::single("currency", "must be a 3-letter ISO code"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Payline Error: {}", _0)]
pub struct PaylineError(Box<PaylineErrorKind>);

impl PaylineError {
    /// Create a new error from a kind.
    pub fn new(kind: PaylineErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &PaylineErrorKind {
        &self.0
    }

    /// Borrow the API error, if this is one.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self.kind() {
            PaylineErrorKind::Api(err) => Some(err),
            _ => None,
        }
    }

    /// Borrow the validation error, if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self.kind() {
            PaylineErrorKind::Validation(err) => Some(err),
            _ => None,
        }
    }

    /// Borrow the webhook error, if this is one.
    pub fn as_webhook(&self) -> Option<&WebhookError> {
        match self.kind() {
            PaylineErrorKind::Webhook(err) => Some(err),
            _ => None,
        }
    }
}

impl RetryableError for PaylineError {
    fn is_retryable(&self) -> bool {
        match self.kind() {
            PaylineErrorKind::Api(err) => err.is_retryable(),
            PaylineErrorKind::Http(_) => true,
            _ => false,
        }
    }

    fn retry_after(&self) -> Option<std::time::Duration> {
        self.as_api().and_then(RetryableError::retry_after)
    }
}

// Generic From implementation for any type that converts to PaylineErrorKind
impl<T> From<T> for PaylineError
where
    T: Into<PaylineErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Payline operations.
///
/// # Examples
///
/// ```
/// use payline_error::{PaylineResult, HttpError};
///
/// fn fetch_data() -> PaylineResult<String> {
///     Err(HttpError::new("connection reset by peer"))?
/// }
/// ```
pub type PaylineResult<T> = std::result::Result<T, PaylineError>;
