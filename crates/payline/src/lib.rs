//! Payline - typed client for the Payline payments API
//!
//! Payline wraps the payments REST API behind typed resource clients that
//! share one request pipeline: a token-bucket rate limiter, a configurable
//! retry classifier and cursor pagination.
//!
//! # Features
//!
//! - **Rate Limiting**: Client-side token bucket plus `Retry-After` handling on HTTP 429
//! - **Retry Classification**: Every failure is labelled retryable or terminal
//! - **Cursor Pagination**: Single pages, bounded walks, resumable paginators and streams
//! - **Validation**: Request payloads are checked before any network call
//! - **Idempotency**: Create calls always carry an idempotency key
//! - **Webhooks**: Callback token and HMAC-SHA256 signature verification
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use payline::{CursorOptions, PaylineClient, PaylineConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PaylineClient::new(&PaylineConfig::load()?)?;
//!
//!     let page = client.invoices().list(&CursorOptions::new().with_limit(20)).await?;
//!     for invoice in &page.data {
//!         println!("{} {}", invoice.external_id(), invoice.status());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `payline_error` - Error types and retry classes
//! - `payline_core` - Resource models, cursor types and validation
//! - `payline_rate_limit` - Token bucket, retry policy and configuration
//! - `payline_pagination` - Pagination engine and paginator
//! - `payline_client` - Transport, request pipeline and resource clients
//! - `payline_webhook` - Webhook verification
//!
//! This crate (`payline`) re-exports everything for convenience and hosts the CLI.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use payline_client::*;
pub use payline_core::*;
pub use payline_error::*;
pub use payline_pagination::*;
pub use payline_rate_limit::*;
pub use payline_webhook::*;

pub mod cli;
pub mod telemetry;
