//! Rate-limited request pipeline.
//!
//! Every call passes three interceptors in order:
//! 1. Admission: spend a token from the [`TokenBucketLimiter`], waiting if
//!    the bucket is empty, then sleep the configured request delay.
//! 2. Response inspection: report quota exhaustion; on HTTP 429 wait out
//!    `retry-after`, capped at the policy's max delay (or the base delay when absent).
//! 3. Classification: label failures with a [`RetryClass`] and surface them
//!    as [`ApiError`]s.
//!
//! The pipeline never resubmits a request. Resubmission belongs to the caller
//! or to [`send_with_retry`](crate::send_with_retry).

use crate::{ApiRequest, ApiResponse, PipelineEvent, PipelineObserver, TracingObserver, Transport};
use payline_error::{ApiError, ApiErrorBody, ApiErrorKind, HttpError, PaylineResult, RetryClass};
use payline_rate_limit::{
    HeaderRateLimitDetector, PaylineConfig, RateLimitHeaders, RetryClassifier, RetryPolicy,
    TokenBucketLimiter,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Wraps a [`Transport`] with admission control and failure classification.
#[derive(Clone)]
pub struct RequestPipeline {
    transport: Arc<dyn Transport>,
    limiter: TokenBucketLimiter,
    classifier: RetryClassifier,
    request_delay: Duration,
    observer: Arc<dyn PipelineObserver>,
    detector: HeaderRateLimitDetector,
}

impl RequestPipeline {
    /// Create a pipeline with no request delay and the tracing observer.
    pub fn new(
        transport: Arc<dyn Transport>,
        limiter: TokenBucketLimiter,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            limiter,
            classifier: RetryClassifier::new(policy),
            request_delay: Duration::ZERO,
            observer: Arc::new(TracingObserver),
            detector: HeaderRateLimitDetector::new(),
        }
    }

    /// Create a pipeline from the `[rate_limit]` and `[retry]` settings.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a zero bucket capacity or window.
    pub fn from_config(transport: Arc<dyn Transport>, config: &PaylineConfig) -> PaylineResult<Self> {
        let limiter = config.rate_limit.build_limiter()?;
        Ok(Self::new(transport, limiter, config.retry.policy())
            .with_request_delay(config.rate_limit.request_delay()))
    }

    /// Pause for `delay` after every admission.
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Report events to `observer` instead of the tracing observer.
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// The shared token bucket.
    pub fn limiter(&self) -> &TokenBucketLimiter {
        &self.limiter
    }

    /// The retry policy used for classification and 429 fallback.
    pub fn policy(&self) -> &RetryPolicy {
        self.classifier.policy()
    }

    /// The event observer.
    pub fn observer(&self) -> &dyn PipelineObserver {
        self.observer.as_ref()
    }

    /// Latest rate limit headers reported by the server.
    pub async fn last_rate_limit(&self) -> Option<RateLimitHeaders> {
        self.detector.latest().await
    }

    /// Send `request` and return the 2xx response.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] for any non-2xx response or when no response
    /// arrived. A 429 is returned only after its backoff has elapsed.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn send(&self, request: &ApiRequest) -> PaylineResult<ApiResponse> {
        let waited = self.limiter.acquire().await;
        if !waited.is_zero() {
            self.observer
                .on_event(&PipelineEvent::AdmissionDelayed { wait: waited });
        }
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }

        match self.transport.send(request).await {
            Ok(response) if response.is_success() => {
                let headers = self.detector.observe(&response.headers).await;
                if headers.is_exhausted() {
                    self.observer.on_event(&PipelineEvent::QuotaExhausted {
                        path: request.path.clone(),
                    });
                }
                debug!(status = response.status, "Request completed");
                Ok(response)
            }
            Ok(response) => Err(self.reject(request, response).await.into()),
            Err(err) => Err(self.network_failure(request, err).into()),
        }
    }

    /// Send `request` and decode the 2xx body as JSON.
    ///
    /// # Errors
    ///
    /// As [`send`](Self::send), plus a JSON error when decoding fails.
    pub async fn send_json<T: DeserializeOwned>(&self, request: &ApiRequest) -> PaylineResult<T> {
        self.send(request).await?.json()
    }

    async fn reject(&self, request: &ApiRequest, response: ApiResponse) -> ApiError {
        let headers = self.detector.observe(&response.headers).await;
        let body = ApiErrorBody::parse(&response.body);

        // A 429 is retryable whatever the configured status set says.
        if response.status == 429 {
            let max_delay = *self.policy().max_delay();
            let backoff = match headers.retry_after {
                Some(retry_after) if retry_after > max_delay => {
                    warn!(?retry_after, ?max_delay, "Capping server retry-after");
                    max_delay
                }
                Some(retry_after) => retry_after,
                None => *self.policy().base_delay(),
            };
            self.observer.on_event(&PipelineEvent::RateLimited {
                path: request.path.clone(),
                backoff,
            });
            tokio::time::sleep(backoff).await;
            return ApiError::new(
                ApiErrorKind::RateLimited { backoff, body },
                RetryClass::Retryable,
            );
        }

        let class = self.classifier.classify(Some(response.status));

        if class == RetryClass::Retryable {
            self.observer.on_event(&PipelineEvent::RetryableFailure {
                path: request.path.clone(),
                status: Some(response.status),
            });
        }
        debug!(status = response.status, error_code = %body.error_code, class = %class, "Request failed");
        ApiError::new(
            ApiErrorKind::Status {
                status: response.status,
                body,
            },
            class,
        )
    }

    fn network_failure(&self, request: &ApiRequest, err: HttpError) -> ApiError {
        let class = self.classifier.classify(None);
        self.observer.on_event(&PipelineEvent::RetryableFailure {
            path: request.path.clone(),
            status: None,
        });
        let message = if err.timed_out {
            format!("timed out: {}", err.message)
        } else {
            err.message
        };
        ApiError::new(ApiErrorKind::Network(message), class)
    }
}

impl std::fmt::Debug for RequestPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestPipeline")
            .field("limiter", &self.limiter)
            .field("classifier", &self.classifier)
            .field("request_delay", &self.request_delay)
            .finish_non_exhaustive()
    }
}
