//! Caller-side retry loop.

use crate::{PipelineEvent, PipelineObserver};
use payline_error::{PaylineError, PaylineResult, RetryableError};
use payline_rate_limit::RetryPolicy;
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio_retry2::strategy::jitter;
use tokio_retry2::{Retry, RetryError};
use tracing::warn;

/// Run `operation`, resubmitting retryable failures.
///
/// Backoff starts at the policy's base delay, doubles per retry, is capped at
/// `max_delay` and jittered. At most `max_retries` resubmissions happen;
/// terminal failures return immediately. Each resubmission is reported to
/// `observer` as [`PipelineEvent::Retrying`].
///
/// # Errors
///
/// Returns the first terminal error, or the last retryable one once the
/// retries are spent.
pub async fn send_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    observer: &dyn PipelineObserver,
    mut operation: F,
) -> PaylineResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = PaylineResult<T>>,
{
    let delays: Vec<Duration> = policy.schedule().map(jitter).collect();
    let attempts = AtomicU32::new(0);

    Retry::spawn(delays.clone(), || {
        let attempt = attempts.fetch_add(1, Ordering::Relaxed);
        if attempt > 0 {
            let delay = delays
                .get(attempt as usize - 1)
                .copied()
                .unwrap_or_default();
            observer.on_event(&PipelineEvent::Retrying { attempt, delay });
        }
        let pending = operation();
        async move {
            match pending.await {
                Ok(value) => Ok(value),
                Err(e) => classify(e),
            }
        }
    })
    .await
}

fn classify<T>(e: PaylineError) -> Result<T, RetryError<PaylineError>> {
    if e.is_retryable() {
        warn!("Transient error, will retry: {}", e);
        Err(RetryError::Transient {
            err: e,
            retry_after: None,
        })
    } else {
        warn!("Permanent error, failing immediately: {}", e);
        Err(RetryError::Permanent(e))
    }
}
