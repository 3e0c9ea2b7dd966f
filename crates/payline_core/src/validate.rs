//! Local request validation.
//!
//! Requests are checked before they reach the rate limiter or the network,
//! so a malformed payload never costs a token.

use payline_error::{PaylineResult, ValidationError, Violation};
use regex::Regex;
use std::sync::LazyLock;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

static PHONE_E164: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[1-9][0-9]{6,14}$").expect("phone pattern is valid"));

static CURRENCY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").expect("currency pattern is valid"));

static COUNTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}$").expect("country pattern is valid"));

/// Request payloads that can be checked locally.
pub trait Validate {
    /// Check the payload.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first failing field and listing
    /// every violated rule.
    fn validate(&self) -> PaylineResult<()>;
}

/// Accumulates violations while a payload is walked.
///
/// # Examples
///
/// ```
/// use payline_core::Violations;
///
/// let mut v = Violations::new();
/// v.non_empty("external_id", "");
/// v.positive("amount", -5.0);
/// let err = v.finish().unwrap_err();
///
/// let validation = err.as_validation().unwrap();
/// assert_eq!(validation.field(), "external_id");
/// assert_eq!(validation.violations().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct Violations {
    found: Vec<Violation>,
}

impl Violations {
    /// Start with no violations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation when `ok` is false.
    pub fn check(&mut self, ok: bool, path: &str, message: &str) -> &mut Self {
        if !ok {
            self.found.push(Violation::new(path, message));
        }
        self
    }

    /// Require a non-blank string.
    pub fn non_empty(&mut self, path: &str, value: &str) -> &mut Self {
        self.check(!value.trim().is_empty(), path, "must not be empty")
    }

    /// Require a string no longer than `max` characters.
    pub fn max_len(&mut self, path: &str, value: &str, max: usize) -> &mut Self {
        let ok = value.chars().count() <= max;
        self.check(ok, path, &format!("must be at most {} characters", max))
    }

    /// Require a finite amount greater than zero.
    pub fn positive(&mut self, path: &str, amount: f64) -> &mut Self {
        self.check(
            amount.is_finite() && amount > 0.0,
            path,
            "must be greater than zero",
        )
    }

    /// Require an ISO-4217 shaped currency code.
    pub fn currency(&mut self, path: &str, code: &str) -> &mut Self {
        self.check(
            CURRENCY.is_match(code),
            path,
            "must be a 3-letter uppercase ISO-4217 code",
        )
    }

    /// Require an ISO-3166 alpha-2 shaped country code.
    pub fn country(&mut self, path: &str, code: &str) -> &mut Self {
        self.check(
            COUNTRY.is_match(code),
            path,
            "must be a 2-letter uppercase ISO-3166 code",
        )
    }

    /// Validate an optional email address.
    pub fn email(&mut self, path: &str, email: Option<&str>) -> &mut Self {
        if let Some(email) = email {
            self.check(EMAIL.is_match(email), path, "must be a valid email address");
        }
        self
    }

    /// Validate an optional E.164 phone number.
    pub fn phone(&mut self, path: &str, phone: Option<&str>) -> &mut Self {
        if let Some(phone) = phone {
            self.check(
                PHONE_E164.is_match(phone),
                path,
                "must be an E.164 number such as +628123456789",
            );
        }
        self
    }

    /// Validate an optional absolute http(s) URL.
    pub fn url(&mut self, path: &str, url: Option<&str>) -> &mut Self {
        if let Some(url) = url {
            let ok = url.starts_with("https://") || url.starts_with("http://");
            self.check(ok, path, "must be an absolute http(s) URL");
        }
        self
    }

    /// Turn the collected violations into a result.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when at least one rule was violated. Its
    /// field is the top-level segment of the first violation's path.
    #[track_caller]
    pub fn finish(&mut self) -> PaylineResult<()> {
        if self.found.is_empty() {
            return Ok(());
        }
        let violations = std::mem::take(&mut self.found);
        let field = violations[0]
            .path
            .split(['.', '['])
            .next()
            .unwrap_or_default()
            .to_string();
        Err(ValidationError::new(field, violations).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_is_top_level_segment() {
        let mut v = Violations::new();
        v.non_empty("individual_detail.given_names", " ");
        let err = v.finish().unwrap_err();
        assert_eq!(err.as_validation().unwrap().field(), "individual_detail");
    }

    #[test]
    fn test_indexed_path() {
        let mut v = Violations::new();
        v.non_empty("items[2].name", "");
        let err = v.finish().unwrap_err();
        assert_eq!(err.as_validation().unwrap().field(), "items");
    }

    #[test]
    fn test_formats() {
        let mut v = Violations::new();
        v.currency("currency", "IDR")
            .country("country", "ID")
            .email("email", Some("a@b.co"))
            .phone("mobile_number", Some("+628123456789"))
            .url("success_return_url", Some("https://example.com/ok"));
        assert!(v.finish().is_ok());

        let mut v = Violations::new();
        v.currency("currency", "idr")
            .email("email", Some("nope"))
            .phone("mobile_number", Some("08123"));
        let err = v.finish().unwrap_err();
        assert_eq!(err.as_validation().unwrap().violations().len(), 3);
    }

    #[test]
    fn test_nan_amount_rejected() {
        let mut v = Violations::new();
        v.positive("amount", f64::NAN);
        assert!(v.finish().is_err());
    }
}
