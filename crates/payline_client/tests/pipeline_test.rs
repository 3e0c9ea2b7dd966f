//! Request pipeline interceptors against a scripted transport.

mod test_utils;

use payline_client::{ApiRequest, PipelineEvent, RequestPipeline};
use payline_error::{ApiErrorKind, RetryClass};
use payline_rate_limit::{RetryPolicy, TokenBucketLimiter};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use test_utils::{EventLog, MockReply, MockTransport, pipeline};
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn test_rate_limited_waits_retry_after_then_surfaces() {
    let transport = MockTransport::new(vec![MockReply::json_with_headers(
        429,
        &[("Retry-After", "2")],
        json!({"error_code": "RATE_LIMIT_EXCEEDED", "message": "slow down"}),
    )]);
    let log = EventLog::default();
    let pipeline = pipeline(&transport, &log);

    let start = Instant::now();
    let err = pipeline
        .send(&ApiRequest::get("/customers"))
        .await
        .unwrap_err();
    let elapsed = start.elapsed();

    assert!(elapsed >= Duration::from_millis(2000));
    assert!(elapsed < Duration::from_millis(2100));

    let api = err.as_api().expect("api error");
    assert_eq!(api.retry_class(), RetryClass::Retryable);
    assert_eq!(api.status(), Some(429));
    assert_eq!(api.error_code(), Some("RATE_LIMIT_EXCEEDED"));
    assert!(matches!(
        api.kind(),
        ApiErrorKind::RateLimited { backoff, .. } if *backoff == Duration::from_secs(2)
    ));
    assert_eq!(
        log.events(),
        vec![PipelineEvent::RateLimited {
            path: "/customers".to_string(),
            backoff: Duration::from_secs(2),
        }]
    );
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limited_is_retryable_without_429_in_status_set() -> anyhow::Result<()> {
    let transport = MockTransport::new(vec![MockReply::json_with_headers(
        429,
        &[("Retry-After", "1")],
        json!({"error_code": "RATE_LIMIT_EXCEEDED", "message": "slow down"}),
    )]);
    let policy = RetryPolicy::new(3, Duration::from_millis(100), Duration::from_secs(5), [503]);
    let pipeline = RequestPipeline::new(
        Arc::new(transport.clone()),
        TokenBucketLimiter::new(100, Duration::from_secs(60))?,
        policy,
    );

    let start = Instant::now();
    let err = pipeline
        .send(&ApiRequest::get("/customers"))
        .await
        .unwrap_err();
    assert!(start.elapsed() >= Duration::from_secs(1));

    let api = err.as_api().expect("api error");
    assert_eq!(api.status(), Some(429));
    assert_eq!(api.retry_class(), RetryClass::Retryable);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_oversized_retry_after_capped_at_max_delay() {
    let transport = MockTransport::new(vec![MockReply::json_with_headers(
        429,
        &[("Retry-After", "1e12")],
        json!({}),
    )]);
    let log = EventLog::default();
    let pipeline = pipeline(&transport, &log);

    let start = Instant::now();
    let err = pipeline
        .send(&ApiRequest::get("/invoices"))
        .await
        .unwrap_err();
    let elapsed = start.elapsed();

    assert!(elapsed >= Duration::from_secs(5));
    assert!(elapsed < Duration::from_millis(5100));
    assert!(matches!(
        err.as_api().map(|api| api.kind()),
        Some(ApiErrorKind::RateLimited { backoff, .. }) if *backoff == Duration::from_secs(5)
    ));
    assert_eq!(
        log.events(),
        vec![PipelineEvent::RateLimited {
            path: "/invoices".to_string(),
            backoff: Duration::from_secs(5),
        }]
    );
}

#[tokio::test(start_paused = true)]
async fn test_rate_limited_without_retry_after_uses_base_delay() {
    let transport = MockTransport::new(vec![MockReply::json(429, json!({}))]);
    let log = EventLog::default();
    let pipeline = pipeline(&transport, &log);

    let start = Instant::now();
    let err = pipeline
        .send(&ApiRequest::get("/invoices"))
        .await
        .unwrap_err();

    assert!(start.elapsed() >= Duration::from_millis(100));
    let api = err.as_api().expect("api error");
    assert!(matches!(
        api.kind(),
        ApiErrorKind::RateLimited { backoff, .. } if *backoff == Duration::from_millis(100)
    ));
}

#[tokio::test]
async fn test_not_found_is_terminal_with_parsed_body() {
    let transport = MockTransport::new(vec![MockReply::json(
        404,
        json!({
            "error_code": "DATA_NOT_FOUND",
            "message": "Customer not found",
            "errors": [{"path": "id", "message": "unknown"}]
        }),
    )]);
    let log = EventLog::default();
    let pipeline = pipeline(&transport, &log);

    let err = pipeline
        .send(&ApiRequest::get("/customers/cust_missing"))
        .await
        .unwrap_err();

    let api = err.as_api().expect("api error");
    assert_eq!(api.retry_class(), RetryClass::Terminal);
    assert_eq!(api.status(), Some(404));
    assert_eq!(api.error_code(), Some("DATA_NOT_FOUND"));
    let body = api.body().expect("body");
    assert_eq!(body.message, "Customer not found");
    assert_eq!(body.errors.len(), 1);
    assert!(log.events().is_empty());
}

#[tokio::test]
async fn test_server_error_is_retryable_and_reported() {
    let transport = MockTransport::new(vec![MockReply::json(503, json!({"message": "down"}))]);
    let log = EventLog::default();
    let pipeline = pipeline(&transport, &log);

    let err = pipeline
        .send(&ApiRequest::get("/invoices"))
        .await
        .unwrap_err();

    let api = err.as_api().expect("api error");
    assert_eq!(api.retry_class(), RetryClass::Retryable);
    assert_eq!(
        log.events(),
        vec![PipelineEvent::RetryableFailure {
            path: "/invoices".to_string(),
            status: Some(503),
        }]
    );
    // The pipeline surfaces the failure without resubmitting
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn test_network_failure_is_retryable() {
    let transport = MockTransport::new(vec![MockReply::network("connection reset by peer")]);
    let log = EventLog::default();
    let pipeline = pipeline(&transport, &log);

    let err = pipeline
        .send(&ApiRequest::get("/sessions/ps_1"))
        .await
        .unwrap_err();

    let api = err.as_api().expect("api error");
    assert_eq!(api.retry_class(), RetryClass::Retryable);
    assert_eq!(api.status(), None);
    assert!(err.to_string().contains("connection reset by peer"));
    assert_eq!(
        log.events(),
        vec![PipelineEvent::RetryableFailure {
            path: "/sessions/ps_1".to_string(),
            status: None,
        }]
    );
}

#[tokio::test]
async fn test_quota_exhaustion_is_reported_not_failed() -> anyhow::Result<()> {
    let transport = MockTransport::new(vec![MockReply::json_with_headers(
        200,
        &[("X-RateLimit-Remaining", "0"), ("X-RateLimit-Limit", "60")],
        json!({"id": "cust_1"}),
    )]);
    let log = EventLog::default();
    let pipeline = pipeline(&transport, &log);

    let response = pipeline.send(&ApiRequest::get("/customers/cust_1")).await?;

    assert_eq!(response.status, 200);
    assert_eq!(
        log.events(),
        vec![PipelineEvent::QuotaExhausted {
            path: "/customers/cust_1".to_string(),
        }]
    );
    let latest = pipeline.last_rate_limit().await.expect("headers recorded");
    assert_eq!(latest.remaining, Some(0));
    assert_eq!(latest.limit, Some(60));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_empty_bucket_delays_admission() -> anyhow::Result<()> {
    let transport = MockTransport::default();
    let log = EventLog::default();
    let limiter = TokenBucketLimiter::new(1, Duration::from_millis(1000))?;
    let pipeline = RequestPipeline::new(Arc::new(transport.clone()), limiter, RetryPolicy::default())
        .with_observer(log.observer());

    let start = Instant::now();
    pipeline.send(&ApiRequest::get("/customers")).await?;
    assert!(log.events().is_empty());

    pipeline.send(&ApiRequest::get("/customers")).await?;
    assert!(start.elapsed() >= Duration::from_millis(1000));
    assert_eq!(
        log.events(),
        vec![PipelineEvent::AdmissionDelayed {
            wait: Duration::from_millis(1000),
        }]
    );
    assert_eq!(transport.call_count(), 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_request_delay_applies_after_admission() -> anyhow::Result<()> {
    let transport = MockTransport::default();
    let log = EventLog::default();
    let pipeline = pipeline(&transport, &log).with_request_delay(Duration::from_millis(250));

    let start = Instant::now();
    pipeline.send(&ApiRequest::get("/customers")).await?;
    pipeline.send(&ApiRequest::get("/customers")).await?;

    assert!(start.elapsed() >= Duration::from_millis(500));
    // Request delay is not an admission delay
    assert!(log.events().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_send_json_decodes_success_body() -> anyhow::Result<()> {
    #[derive(serde::Deserialize)]
    struct Echo {
        id: String,
    }

    let transport = MockTransport::new(vec![MockReply::json(200, json!({"id": "inv_9"}))]);
    let pipeline = pipeline(&transport, &EventLog::default());

    let echo: Echo = pipeline.send_json(&ApiRequest::get("/invoices/inv_9")).await?;
    assert_eq!(echo.id, "inv_9");

    let transport = MockTransport::new(vec![MockReply::json(200, json!(["not", "an", "object"]))]);
    let pipeline = test_utils::pipeline(&transport, &EventLog::default());
    let err = pipeline
        .send_json::<Echo>(&ApiRequest::get("/invoices/inv_9"))
        .await
        .err()
        .expect("decode failure");
    assert!(err.as_api().is_none());
    Ok(())
}
