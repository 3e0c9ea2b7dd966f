//! Test utilities for Payline client tests.
//!
//! This module provides a scripted transport and event recorder.

#![allow(dead_code)]

pub mod mock_transport;

#[allow(unused_imports)]
pub use mock_transport::{MockReply, MockTransport};

use payline_client::{PaylineClient, PipelineEvent, RequestPipeline};
use payline_rate_limit::{PaylineConfig, RetryPolicy, TokenBucketLimiter};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Collects pipeline events for assertions.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<PipelineEvent>>>,
}

impl EventLog {
    /// An observer closure appending to this log.
    pub fn observer(&self) -> Arc<dyn payline_client::PipelineObserver> {
        let events = Arc::clone(&self.events);
        Arc::new(move |event: &PipelineEvent| events.lock().unwrap().push(event.clone()))
    }

    /// Everything recorded so far.
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.lock().unwrap().clone()
    }
}

/// A pipeline over `transport` with a generous bucket and a short base delay.
pub fn pipeline(transport: &MockTransport, log: &EventLog) -> RequestPipeline {
    let limiter = TokenBucketLimiter::new(100, Duration::from_secs(60)).unwrap();
    let policy = RetryPolicy::new(
        3,
        Duration::from_millis(100),
        Duration::from_secs(5),
        payline_rate_limit::DEFAULT_RETRYABLE_STATUS_CODES,
    );
    RequestPipeline::new(Arc::new(transport.clone()), limiter, policy).with_observer(log.observer())
}

/// A client over `transport` using the bundled defaults.
pub fn client(transport: &MockTransport) -> PaylineClient {
    PaylineClient::with_transport(Arc::new(transport.clone()), &config()).unwrap()
}

/// The bundled default configuration.
pub fn config() -> PaylineConfig {
    PaylineConfig::from_toml_str(PaylineConfig::bundled_defaults()).unwrap()
}
