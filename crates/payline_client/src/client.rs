//! The top-level client handle.

use crate::{
    ApiRequest, Customers, EwalletCharges, Invoices, PaymentMethods, PipelineObserver,
    ReqwestTransport, RequestPipeline, Sessions, Transport, send_with_retry,
};
use payline_error::PaylineResult;
use payline_rate_limit::PaylineConfig;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Entry point for the Payline API.
///
/// Clones share one request pipeline, and with it one token bucket, so a
/// cloned client never doubles the configured request rate.
///
/// # Examples
///
/// ```no_run
/// use payline_client::PaylineClient;
/// use payline_core::CursorOptions;
///
/// # async fn run() -> payline_error::PaylineResult<()> {
/// let client = PaylineClient::load()?;
/// let page = client.customers().list(&CursorOptions::new().with_limit(20)).await?;
/// println!("{} customers, more: {}", page.len(), page.has_more);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PaylineClient {
    pipeline: Arc<RequestPipeline>,
    auto_retry: bool,
}

impl PaylineClient {
    /// Build a client that talks to the configured API over HTTP.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no secret key is set or the rate
    /// limit settings are invalid.
    #[instrument(skip(config), fields(base_url = %config.api.base_url))]
    pub fn new(config: &PaylineConfig) -> PaylineResult<Self> {
        let transport = ReqwestTransport::new(&config.api)?;
        Self::with_transport(Arc::new(transport), config)
    }

    /// Build a client from the layered configuration sources.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if loading fails or no secret key is set.
    pub fn load() -> PaylineResult<Self> {
        Self::new(&PaylineConfig::load()?)
    }

    /// Build a client over any [`Transport`].
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the rate limit settings are invalid.
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        config: &PaylineConfig,
    ) -> PaylineResult<Self> {
        let pipeline = RequestPipeline::from_config(transport, config)?;
        debug!(
            max_requests = config.rate_limit.max_requests,
            window_ms = config.rate_limit.window_ms,
            auto_retry = config.retry.auto_retry,
            "Created Payline client"
        );
        Ok(Self::from_pipeline(pipeline, config.retry.auto_retry))
    }

    /// Wrap an existing pipeline.
    pub fn from_pipeline(pipeline: RequestPipeline, auto_retry: bool) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            auto_retry,
        }
    }

    /// Replace the pipeline observer.
    ///
    /// The token bucket is kept, so clients created before this call keep
    /// sharing it.
    pub fn with_observer(self, observer: Arc<dyn PipelineObserver>) -> Self {
        let pipeline = (*self.pipeline).clone().with_observer(observer);
        Self {
            pipeline: Arc::new(pipeline),
            auto_retry: self.auto_retry,
        }
    }

    /// Turn the caller-side retry loop on or off.
    pub fn with_auto_retry(mut self, auto_retry: bool) -> Self {
        self.auto_retry = auto_retry;
        self
    }

    /// Whether retryable failures are resubmitted automatically.
    pub fn auto_retry(&self) -> bool {
        self.auto_retry
    }

    /// The request pipeline.
    pub fn pipeline(&self) -> &RequestPipeline {
        &self.pipeline
    }

    /// Customer endpoints.
    pub fn customers(&self) -> Customers {
        Customers::new(self.clone())
    }

    /// Invoice endpoints.
    pub fn invoices(&self) -> Invoices {
        Invoices::new(self.clone())
    }

    /// Payment method endpoints.
    pub fn payment_methods(&self) -> PaymentMethods {
        PaymentMethods::new(self.clone())
    }

    /// E-wallet charge endpoints.
    pub fn ewallet_charges(&self) -> EwalletCharges {
        EwalletCharges::new(self.clone())
    }

    /// Payment session endpoints.
    pub fn sessions(&self) -> Sessions {
        Sessions::new(self.clone())
    }

    /// Send `request` and decode the JSON response.
    ///
    /// With auto retry on, retryable failures are resubmitted under the
    /// configured [`RetryPolicy`](payline_rate_limit::RetryPolicy).
    ///
    /// # Errors
    ///
    /// Returns the pipeline error, or a JSON error if the body does not
    /// decode as `T`.
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> PaylineResult<T> {
        if !self.auto_retry {
            return self.pipeline.send_json(&request).await;
        }
        let pipeline = self.pipeline.as_ref();
        send_with_retry(pipeline.policy(), pipeline.observer(), || {
            pipeline.send_json(&request)
        })
        .await
    }
}
