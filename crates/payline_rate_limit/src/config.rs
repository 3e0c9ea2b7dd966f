//! Client configuration.
//!
//! Sources, later overriding earlier:
//! 1. Bundled defaults (`payline.toml` shipped with the library)
//! 2. `~/.config/payline/payline.toml`
//! 3. `./payline.toml`
//! 4. `PAYLINE_*` environment variables, sections separated by `__`
//!    (e.g. `PAYLINE_API__SECRET_KEY`)

use crate::{RetryPolicy, TokenBucketLimiter};
use config::{Config, Environment, File, FileFormat};
use payline_error::{ConfigError, PaylineError, PaylineResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../payline.toml");

/// Connection settings for the payments API.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiConfig {
    /// API root, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Secret API key, sent as the Basic auth username
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    /// Value for the `api-version` header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    /// Sub-account to act for, sent as `for-user-id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub for_user_id: Option<String>,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Per-request timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The secret key, or an error naming the missing setting.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no key is configured.
    #[track_caller]
    pub fn require_secret_key(&self) -> PaylineResult<&str> {
        self.secret_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ConfigError::for_key(
                    "api.secret_key",
                    "no secret key configured (set PAYLINE_API__SECRET_KEY)",
                )
                .into()
            })
    }
}

// Keeps the secret key out of logs and `#[instrument]` fields.
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("api_version", &self.api_version)
            .field("for_user_id", &self.for_user_id)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            secret_key: None,
            api_version: None,
            for_user_id: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Token bucket settings.
///
/// ```toml
/// [rate_limit]
/// max_requests = 100
/// window_ms = 60000
/// request_delay_ms = 0
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Bucket capacity: requests allowed per window
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    /// Time for an empty bucket to refill
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
    /// Pause after every admitted request
    #[serde(default)]
    pub request_delay_ms: u64,
}

impl RateLimitConfig {
    /// Refill window as a duration.
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    /// Post-admission delay as a duration.
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    /// Build a full token bucket for these settings.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a zero capacity or window.
    pub fn build_limiter(&self) -> PaylineResult<TokenBucketLimiter> {
        TokenBucketLimiter::new(self.max_requests, self.window())
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_ms: default_window_ms(),
            request_delay_ms: 0,
        }
    }
}

/// Retry and backoff settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RetryConfig {
    /// Resubmissions allowed after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// First backoff delay, also the 429 fallback
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Backoff ceiling
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Statuses treated as transient; empty means the defaults
    #[serde(default)]
    pub retryable_status_codes: Vec<u16>,
    /// Resubmit retryable failures automatically from resource clients
    #[serde(default)]
    pub auto_retry: bool,
}

impl RetryConfig {
    /// Build the immutable retry policy.
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::from_config(self)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            retryable_status_codes: Vec::new(),
            auto_retry: false,
        }
    }
}

fn default_base_url() -> String {
    "https://api.payline.dev".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_requests() -> u32 {
    100
}

fn default_window_ms() -> u64 {
    60_000
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30_000
}

/// Top-level Payline configuration.
///
/// # Example
///
/// ```no_run
/// use payline_rate_limit::PaylineConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = PaylineConfig::load()?;
/// println!("Bucket capacity: {}", config.rate_limit.max_requests);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct PaylineConfig {
    /// API connection settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Token bucket settings
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Retry settings
    #[serde(default)]
    pub retry: RetryConfig,
}

impl PaylineConfig {
    /// Load configuration from a specific file path.
    ///
    /// Settings missing from the file take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> PaylineResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                PaylineError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                PaylineError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid configuration.
    pub fn from_toml_str(toml: &str) -> PaylineResult<Self> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .and_then(|config| config.try_deserialize::<Self>())
            .map_err(|e| {
                PaylineError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Load configuration with precedence:
    /// environment > current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and skipped when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if a present source cannot be parsed.
    #[instrument]
    pub fn load() -> PaylineResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(config_dir) = dirs::home_dir() {
            let home_config = config_dir.join(".config/payline/payline.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("payline").required(false))
            .add_source(
                Environment::with_prefix("PAYLINE")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("retry.retryable_status_codes")
                    .try_parsing(true),
            );

        builder
            .build()
            .map_err(|e| {
                PaylineError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                PaylineError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// The bundled default configuration text.
    pub fn bundled_defaults() -> &'static str {
        DEFAULT_CONFIG
    }
}
