//! JSON encode/decode error types.

/// Failure to serialize a request body or decode a response body.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("JSON Error: {} ({}) at line {} in {}", message, context, line, file)]
pub struct JsonError {
    /// The underlying serde message
    pub message: String,
    /// What was being encoded or decoded, e.g. `"GET /customers response"`
    pub context: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl JsonError {
    /// Create a new JsonError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use payline_error::JsonError;
    ///
    /// let err = JsonError::new("expected value at line 1 column 1", "invoice response");
    /// assert_eq!(err.context, "invoice response");
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>, context: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            context: context.into(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// Wrap a `serde_json` error, recording what was being processed.
    #[track_caller]
    pub fn from_serde(err: &serde_json::Error, context: impl Into<String>) -> Self {
        Self::new(err.to_string(), context)
    }
}
