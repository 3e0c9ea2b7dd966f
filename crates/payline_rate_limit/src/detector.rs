//! Rate limit signals carried in API response headers.
//!
//! The payments API reports its own view of the quota on every response:
//! - `x-ratelimit-limit`: requests allowed in the current window
//! - `x-ratelimit-remaining`: requests left in the current window
//! - `x-ratelimit-reset`: seconds until the window resets
//! - `retry-after`: seconds to wait, sent with HTTP 429
//!
//! Header names are expected lower-cased, as the transport delivers them.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Rate limit headers parsed from one response.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RateLimitHeaders {
    /// Requests allowed in the current window
    pub limit: Option<u32>,
    /// Requests left in the current window
    pub remaining: Option<u32>,
    /// Seconds until the window resets
    pub reset_secs: Option<u64>,
    /// Server-requested wait before the next attempt
    pub retry_after: Option<Duration>,
}

impl RateLimitHeaders {
    /// Parse the rate limit headers out of a lower-cased header map.
    ///
    /// Missing or malformed values are left unset.
    ///
    /// # Examples
    ///
    /// ```
    /// use payline_rate_limit::RateLimitHeaders;
    /// use std::collections::HashMap;
    /// use std::time::Duration;
    ///
    /// let headers = HashMap::from([
    ///     ("x-ratelimit-remaining".to_string(), "0".to_string()),
    ///     ("retry-after".to_string(), "2".to_string()),
    /// ]);
    /// let parsed = RateLimitHeaders::from_headers(&headers);
    /// assert!(parsed.is_exhausted());
    /// assert_eq!(parsed.retry_after, Some(Duration::from_millis(2000)));
    /// ```
    pub fn from_headers(headers: &HashMap<String, String>) -> Self {
        Self {
            limit: parse_header(headers, "x-ratelimit-limit"),
            remaining: parse_header(headers, "x-ratelimit-remaining"),
            reset_secs: parse_header(headers, "x-ratelimit-reset"),
            retry_after: parse_retry_after(headers),
        }
    }

    /// True when the server reports no requests left in the window.
    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    /// True when no rate limit header was present.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Remembers the most recent rate limit headers the server sent.
///
/// Clones share the same snapshot.
#[derive(Debug, Clone, Default)]
pub struct HeaderRateLimitDetector {
    latest: Arc<RwLock<Option<RateLimitHeaders>>>,
}

impl HeaderRateLimitDetector {
    /// Create a detector with nothing recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `headers` and remember them when any rate limit header is present.
    #[instrument(skip(self, headers))]
    pub async fn observe(&self, headers: &HashMap<String, String>) -> RateLimitHeaders {
        let parsed = RateLimitHeaders::from_headers(headers);
        if !parsed.is_empty() {
            debug!(
                limit = ?parsed.limit,
                remaining = ?parsed.remaining,
                "Recorded rate limit headers"
            );
            *self.latest.write().await = Some(parsed);
        }
        parsed
    }

    /// The last recorded snapshot.
    pub async fn latest(&self) -> Option<RateLimitHeaders> {
        *self.latest.read().await
    }

    /// Forget the recorded snapshot.
    pub async fn clear(&self) {
        *self.latest.write().await = None;
    }
}

/// Helper to parse a numeric header value.
fn parse_header<T: std::str::FromStr>(headers: &HashMap<String, String>, key: &str) -> Option<T> {
    headers.get(key)?.trim().parse().ok()
}

/// `retry-after` in seconds, whole or fractional, converted to a duration.
fn parse_retry_after(headers: &HashMap<String, String>) -> Option<Duration> {
    let secs: f64 = parse_header(headers, "retry-after")?;
    if secs.is_finite() && secs >= 0.0 {
        Some(Duration::from_millis((secs * 1000.0).round() as u64))
    } else {
        None
    }
}
