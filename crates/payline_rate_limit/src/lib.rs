//! Rate limiting and retry policy for the Payline client.
//!
//! - [`TokenBucket`] / [`TokenBucketLimiter`]: continuous-refill admission
//!   control, one token per request
//! - [`RetryPolicy`] / [`RetryClassifier`]: which failures are transient and
//!   how long to back off
//! - [`RateLimitHeaders`] / [`HeaderRateLimitDetector`]: the server's own view
//!   of the quota, read from response headers
//! - [`PaylineConfig`]: layered TOML and environment configuration

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod bucket;
mod config;
mod detector;
mod retry;

pub use bucket::{TokenBucket, TokenBucketLimiter};
pub use config::{ApiConfig, PaylineConfig, RateLimitConfig, RetryConfig};
pub use detector::{HeaderRateLimitDetector, RateLimitHeaders};
pub use retry::{DEFAULT_RETRYABLE_STATUS_CODES, RetryClassifier, RetryPolicy};
