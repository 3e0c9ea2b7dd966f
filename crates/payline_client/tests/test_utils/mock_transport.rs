//! Scripted transport for pipeline and resource tests.

use async_trait::async_trait;
use payline_client::{ApiRequest, ApiResponse, Transport};
use payline_error::HttpError;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// A single scripted reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// A response with status, headers and JSON body
    Response(ApiResponse),
    /// No response at all
    Error(HttpError),
}

impl MockReply {
    /// A JSON response with no headers.
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self::Response(ApiResponse::new(status, HashMap::new(), body.to_string()))
    }

    /// A JSON response with headers.
    pub fn json_with_headers(status: u16, headers: &[(&str, &str)], body: serde_json::Value) -> Self {
        let headers = headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self::Response(ApiResponse::new(status, headers, body.to_string()))
    }

    /// A transport failure.
    pub fn network(message: &str) -> Self {
        Self::Error(HttpError::new(message))
    }
}

/// Mock transport replaying scripted replies in order.
///
/// Once the script runs out every call gets `200 {}`.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl MockTransport {
    /// Create a transport with the given script.
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            requests: Arc::default(),
        }
    }

    /// Number of requests that reached the transport.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Every request that reached the transport, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The most recent request.
    #[allow(dead_code)]
    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, HttpError> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(MockReply::Response(response)) => Ok(response),
            Some(MockReply::Error(err)) => Err(err),
            None => Ok(ApiResponse::new(200, HashMap::new(), "{}")),
        }
    }
}
