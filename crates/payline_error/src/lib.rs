//! Error types for the Payline payments API client.
//!
//! This crate provides the foundation error types used throughout the Payline workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! Failures coming back from the API carry a [`RetryClass`] so callers can
//! branch on retryable vs terminal without inspecting status codes.
//!
//! # Examples
//!
//! ```
//! use payline_error::{PaylineResult, HttpError, RetryableError};
//!
//! fn fetch_data() -> PaylineResult<String> {
//!     Err(HttpError::new("Connection refused"))?
//! }
//!
//! match fetch_data() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => assert!(e.is_retryable()),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod config;
mod error;
mod http;
mod json;
mod retry;
mod validation;
mod webhook;

pub use api::{ApiError, ApiErrorBody, ApiErrorKind};
pub use config::ConfigError;
pub use error::{PaylineError, PaylineErrorKind, PaylineResult};
pub use http::HttpError;
pub use json::JsonError;
pub use retry::{RetryClass, RetryableError};
pub use validation::{ValidationError, Violation};
pub use webhook::{WebhookError, WebhookErrorKind};
