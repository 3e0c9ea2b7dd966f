//! Configuration error types.

/// Configuration error with source location.
///
/// The offending key, when known, prefixes the message.
#[derive(Debug, Clone, derive_more::Error)]
pub struct ConfigError {
    /// Error message
    pub message: String,
    /// Offending configuration key, when known (e.g. `rate_limit.max_requests`)
    pub key: Option<String>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use payline_error::ConfigError;
    ///
    /// let err = ConfigError::new("Missing secret key");
    /// assert!(err.message.contains("secret key"));
    /// assert!(err.key.is_none());
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            key: None,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Create a ConfigError that names the offending key.
    #[track_caller]
    pub fn for_key(key: impl Into<String>, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            key: Some(key.into()),
            line: location.line(),
            file: location.file(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration Error: ")?;
        if let Some(key) = &self.key {
            write!(f, "{}: ", key)?;
        }
        write!(f, "{} at line {} in {}", self.message, self.line, self.file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_key() {
        let err = ConfigError::for_key("rate_limit.window_ms", "must be greater than zero");
        let shown = err.to_string();
        assert!(shown.starts_with("Configuration Error: rate_limit.window_ms: must be greater than zero"));
    }

    #[test]
    fn test_display_without_key() {
        let shown = ConfigError::new("bad file").to_string();
        assert!(shown.starts_with("Configuration Error: bad file at line"));
    }
}
