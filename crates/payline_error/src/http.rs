//! Transport-level error types.

/// Failure raised before any HTTP response was received.
///
/// Connection refusals, DNS failures, TLS errors and timeouts all land here.
/// Because no status code exists, the pipeline always treats these as
/// retryable.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("HTTP Error: {} at line {} in {}", message, line, file)]
pub struct HttpError {
    /// The underlying error message
    pub message: String,
    /// Whether the request timed out
    pub timed_out: bool,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl HttpError {
    /// Create a new HttpError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use payline_error::HttpError;
    ///
    /// let err = HttpError::new("Connection refused");
    /// assert!(err.message.contains("Connection refused"));
    /// assert!(!err.timed_out);
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            timed_out: false,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Create an error for a request that exceeded its deadline.
    #[track_caller]
    pub fn timeout(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            timed_out: true,
            line: location.line(),
            file: location.file(),
        }
    }
}
