//! Local request validation errors.

/// A single rule violated by a request payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
#[display("{}: {}", path, message)]
pub struct Violation {
    /// Dotted path of the offending value, e.g. `individual_detail.given_names`
    pub path: String,
    /// Human readable description of the rule
    pub message: String,
}

impl Violation {
    /// Create a violation for the value at `path`.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Request-shape validation failure.
///
/// Raised before the request reaches the rate limiter or the network.
///
/// # Examples
///
/// ```
/// use payline_error::{ValidationError, Violation};
///
/// let err = ValidationError::new(
///     "amount",
///     vec![Violation::new("amount", "must be greater than zero")],
/// );
/// assert_eq!(err.field(), "amount");
/// assert_eq!(err.violations().len(), 1);
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} failed {} rule(s) [{}] at line {} in {}", field, violations.len(), summary(violations), line, file)]
pub struct ValidationError {
    field: String,
    violations: Vec<Violation>,
    line: u32,
    file: &'static str,
}

fn summary(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    /// Create a new validation error with caller location tracking.
    #[track_caller]
    pub fn new(field: impl Into<String>, violations: Vec<Violation>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            field: field.into(),
            violations,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a single violation on `field`.
    #[track_caller]
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let field = field.into();
        let violation = Violation::new(field.clone(), message);
        Self::new(field, vec![violation])
    }

    /// Name of the top-level field that failed validation.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Every rule the payload broke.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}
