//! Webhook verification errors.

/// Webhook verification failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum WebhookErrorKind {
    /// The callback token did not match
    #[display("Callback token mismatch")]
    TokenMismatch,
    /// Signature header was not in `sha256=<hex>` form
    #[display("Malformed signature header: {}", _0)]
    MalformedSignature(String),
    /// Computed digest did not match the signature
    #[display("Signature mismatch")]
    SignatureMismatch,
    /// Secret could not be used as an HMAC key
    #[display("Invalid webhook secret")]
    InvalidSecret,
    /// A required verification header was absent
    #[display("Missing webhook header: {}", _0)]
    MissingHeader(String),
    /// Event payload could not be decoded
    #[display("Invalid webhook payload: {}", _0)]
    InvalidPayload(String),
}

/// Webhook error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Webhook Error: {} at line {} in {}", kind, line, file)]
pub struct WebhookError {
    /// The kind of error that occurred
    pub kind: WebhookErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl WebhookError {
    /// Create a new WebhookError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: WebhookErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
