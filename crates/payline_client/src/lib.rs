//! HTTP client for the Payline payments API.
//!
//! Requests flow through a [`RequestPipeline`]:
//!
//! ```text
//! resource client -> validation -> token bucket -> transport -> inspection -> classification
//! ```
//!
//! The pipeline classifies failures as retryable or terminal but never
//! resubmits on its own; [`send_with_retry`] is the opt-in retry loop.
//!
//! # Example
//!
//! ```no_run
//! use payline_client::PaylineClient;
//! use payline_rate_limit::PaylineConfig;
//!
//! # async fn run() -> payline_error::PaylineResult<()> {
//! let config = PaylineConfig::load()?;
//! let client = PaylineClient::new(&config)?;
//!
//! let invoice = client.invoices().get("inv_123").await?;
//! println!("{} is {}", invoice.external_id(), invoice.status());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod observer;
mod pipeline;
mod resources;
mod retry;
mod transport;

pub use client::PaylineClient;
pub use observer::{PipelineEvent, PipelineObserver, TracingObserver};
pub use pipeline::RequestPipeline;
pub use resources::{
    Customers, EwalletCharges, Invoices, ListFetcher, PaymentMethods, ResourceEngine, Sessions,
};
pub use retry::send_with_retry;
pub use transport::{
    ApiRequest, ApiResponse, HttpMethod, IDEMPOTENCY_KEY_HEADER, ReqwestTransport, Transport,
    basic_auth, user_agent,
};
