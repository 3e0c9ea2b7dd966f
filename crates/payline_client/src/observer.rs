//! Pipeline events and the observer port they are reported through.

use std::time::Duration;
use tracing::{debug, warn};

/// Something noteworthy that happened while a request moved through the
/// pipeline. None of these are errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// The local token bucket held the request back
    AdmissionDelayed {
        /// Time spent waiting for a token
        wait: Duration,
    },
    /// The server reported `x-ratelimit-remaining: 0`
    QuotaExhausted {
        /// Request path
        path: String,
    },
    /// The server answered 429; the pipeline is about to wait
    RateLimited {
        /// Request path
        path: String,
        /// How long the pipeline will wait
        backoff: Duration,
    },
    /// A failure was classified as retryable
    RetryableFailure {
        /// Request path
        path: String,
        /// HTTP status, `None` when no response arrived
        status: Option<u16>,
    },
    /// The retry helper is resubmitting a request
    Retrying {
        /// Retry number, starting at 1
        attempt: u32,
        /// Backoff waited before this retry
        delay: Duration,
    },
}

/// Receives [`PipelineEvent`]s.
///
/// Any `Fn(&PipelineEvent)` closure is an observer:
///
/// ```
/// use payline_client::{PipelineEvent, PipelineObserver};
/// use std::sync::{Arc, Mutex};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// let observer = move |event: &PipelineEvent| sink.lock().unwrap().push(event.clone());
///
/// observer.on_event(&PipelineEvent::QuotaExhausted { path: "/customers".into() });
/// assert_eq!(seen.lock().unwrap().len(), 1);
/// ```
pub trait PipelineObserver: Send + Sync {
    /// Handle one event.
    fn on_event(&self, event: &PipelineEvent);
}

impl<F> PipelineObserver for F
where
    F: Fn(&PipelineEvent) + Send + Sync,
{
    fn on_event(&self, event: &PipelineEvent) {
        self(event)
    }
}

/// Default observer: throttling becomes `warn!` records, the rest `debug!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::AdmissionDelayed { wait } => {
                debug!(wait_ms = wait.as_millis() as u64, "Request delayed by local rate limiter");
            }
            PipelineEvent::QuotaExhausted { path } => {
                warn!(path = %path, "Rate limit quota exhausted, subsequent requests may be throttled");
            }
            PipelineEvent::RateLimited { path, backoff } => {
                warn!(
                    path = %path,
                    backoff_ms = backoff.as_millis() as u64,
                    "Rate limited by upstream, backing off"
                );
            }
            PipelineEvent::RetryableFailure { path, status } => {
                warn!(path = %path, status = ?status, "Retryable failure");
            }
            PipelineEvent::Retrying { attempt, delay } => {
                debug!(attempt, delay_ms = delay.as_millis() as u64, "Retrying request");
            }
        }
    }
}
