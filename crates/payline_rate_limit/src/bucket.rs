//! Continuous-refill token bucket.
//!
//! The bucket holds a fractional token count that regenerates linearly:
//! `capacity` tokens every `refill_window`. Each admitted request spends
//! exactly one token.
//!
//! Time comes from [`tokio::time::Instant`], so tests running on a paused
//! runtime (`#[tokio::test(start_paused = true)]`) can drive refill with
//! `tokio::time::advance`. Every operation also has an `*_at` variant taking
//! an explicit instant.

use payline_error::{ConfigError, PaylineResult};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, instrument};

/// Token accounting state.
///
/// # Examples
///
/// ```
/// use payline_rate_limit::TokenBucket;
/// use std::time::Duration;
/// use tokio::time::Instant;
///
/// let start = Instant::now();
/// let mut bucket = TokenBucket::new_at(2, Duration::from_millis(1000), start).unwrap();
///
/// assert!(bucket.try_consume_at(start));
/// assert!(bucket.try_consume_at(start));
/// assert!(!bucket.try_consume_at(start));
/// assert_eq!(bucket.wait_time_at(start), Duration::from_millis(500));
///
/// // Half a window later one token is back
/// assert!(bucket.can_admit_at(start + Duration::from_millis(500)));
/// ```
#[derive(Debug, Clone)]
pub struct TokenBucket {
    capacity: u32,
    refill_window: Duration,
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    /// Create a full bucket.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `capacity` is zero or the window is
    /// empty.
    #[track_caller]
    pub fn new(capacity: u32, refill_window: Duration) -> PaylineResult<Self> {
        Self::new_at(capacity, refill_window, Instant::now())
    }

    /// Create a full bucket whose accounting starts at `now`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `capacity` is zero or the window is
    /// empty.
    #[track_caller]
    pub fn new_at(capacity: u32, refill_window: Duration, now: Instant) -> PaylineResult<Self> {
        if capacity == 0 {
            return Err(ConfigError::for_key("rate_limit.max_requests", "must be at least 1").into());
        }
        if refill_window.is_zero() {
            return Err(ConfigError::for_key("rate_limit.window_ms", "must be greater than zero").into());
        }
        Ok(Self {
            capacity,
            refill_window,
            tokens: f64::from(capacity),
            last_refill: now,
        })
    }

    /// Maximum number of tokens.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Time for an empty bucket to fill completely.
    pub fn refill_window(&self) -> Duration {
        self.refill_window
    }

    /// Token count as of the last accounting update.
    pub fn tokens(&self) -> f64 {
        self.tokens
    }

    fn window_ms(&self) -> f64 {
        self.refill_window.as_secs_f64() * 1000.0
    }

    /// Credit tokens for the time elapsed since the last update.
    pub fn refill(&mut self) {
        self.refill_at(Instant::now());
    }

    /// Credit tokens for the time elapsed up to `now`.
    ///
    /// An instant earlier than the last update credits nothing.
    pub fn refill_at(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill);
        if elapsed.is_zero() {
            return;
        }
        let elapsed_ms = elapsed.as_nanos() as f64 / 1_000_000.0;
        let capacity = f64::from(self.capacity);
        let credited = elapsed_ms * capacity / self.window_ms();
        self.tokens = (self.tokens + credited).min(capacity);
        self.last_refill = now;
    }

    /// Whether a request could be admitted right now.
    pub fn can_admit(&mut self) -> bool {
        self.can_admit_at(Instant::now())
    }

    /// Whether a request could be admitted at `now`.
    pub fn can_admit_at(&mut self, now: Instant) -> bool {
        self.refill_at(now);
        self.tokens >= 1.0
    }

    /// Spend one token if available.
    pub fn try_consume(&mut self) -> bool {
        self.try_consume_at(Instant::now())
    }

    /// Spend one token at `now` if available. Tokens are untouched on failure.
    pub fn try_consume_at(&mut self, now: Instant) -> bool {
        if self.can_admit_at(now) {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// How long until a token is available.
    pub fn wait_time(&mut self) -> Duration {
        self.wait_time_at(Instant::now())
    }

    /// How long after `now` until a token is available, rounded up to the
    /// next whole millisecond.
    pub fn wait_time_at(&mut self, now: Instant) -> Duration {
        if self.can_admit_at(now) {
            return Duration::ZERO;
        }
        let missing = 1.0 - self.tokens;
        let wait_ms = missing * self.window_ms() / f64::from(self.capacity);
        Duration::from_millis(wait_ms.ceil() as u64)
    }
}

/// Shareable handle to a [`TokenBucket`].
///
/// Clones share one bucket. Refill and consumption happen under a single
/// lock, so concurrent callers can never spend the same token twice.
#[derive(Debug, Clone)]
pub struct TokenBucketLimiter {
    bucket: Arc<Mutex<TokenBucket>>,
}

impl TokenBucketLimiter {
    /// Create a limiter around a full bucket.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `capacity` is zero or the window is
    /// empty.
    #[track_caller]
    pub fn new(capacity: u32, refill_window: Duration) -> PaylineResult<Self> {
        Ok(Self::from_bucket(TokenBucket::new(capacity, refill_window)?))
    }

    /// Wrap an existing bucket.
    pub fn from_bucket(bucket: TokenBucket) -> Self {
        Self {
            bucket: Arc::new(Mutex::new(bucket)),
        }
    }

    // Accounting never leaves the bucket half-updated, so a poisoned lock is
    // still consistent.
    fn lock(&self) -> MutexGuard<'_, TokenBucket> {
        self.bucket.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Maximum number of tokens.
    pub fn capacity(&self) -> u32 {
        self.lock().capacity()
    }

    /// Current token count after refilling.
    pub fn tokens(&self) -> f64 {
        let mut bucket = self.lock();
        bucket.refill();
        bucket.tokens()
    }

    /// See [`TokenBucket::can_admit`].
    pub fn can_admit(&self) -> bool {
        self.lock().can_admit()
    }

    /// See [`TokenBucket::try_consume`].
    pub fn try_consume(&self) -> bool {
        self.lock().try_consume()
    }

    /// See [`TokenBucket::wait_time`].
    pub fn wait_time(&self) -> Duration {
        self.lock().wait_time()
    }

    /// Sleep until a token should be available. Does not consume.
    #[instrument(skip(self))]
    pub async fn await_token(&self) {
        let wait = self.wait_time();
        if !wait.is_zero() {
            debug!(wait_ms = wait.as_millis() as u64, "Waiting for rate limit token");
            tokio::time::sleep(wait).await;
        }
    }

    /// Wait for a token and spend it, returning the total time spent waiting.
    ///
    /// Another task may take the token between waking and consuming; the
    /// loop then waits again. Waiters are not served in FIFO order.
    #[instrument(skip(self))]
    pub async fn acquire(&self) -> Duration {
        let mut waited = Duration::ZERO;
        loop {
            let wait = {
                let mut bucket = self.lock();
                if bucket.try_consume() {
                    return waited;
                }
                bucket.wait_time().max(Duration::from_millis(1))
            };
            debug!(wait_ms = wait.as_millis() as u64, "Rate limit bucket empty, sleeping");
            tokio::time::sleep(wait).await;
            waited += wait;
        }
    }
}
