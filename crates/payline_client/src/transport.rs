//! HTTP transport seam and its reqwest implementation.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use payline_error::{ConfigError, HttpError, JsonError, PaylineError, PaylineResult};
use payline_rate_limit::ApiConfig;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, error, instrument};

/// Header carrying the caller's idempotency key on create calls.
pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

/// HTTP methods the API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    /// Read
    Get,
    /// Create or trigger an action
    Post,
    /// Partial update
    Patch,
    /// Remove
    Delete,
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A request as handed to a [`Transport`].
///
/// `path` is relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Path below the base URL, starting with `/`
    pub path: String,
    /// Query pairs in order
    pub query: Vec<(String, String)>,
    /// Per-request headers, lower-cased names
    pub headers: BTreeMap<String, String>,
    /// JSON body
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    /// A request with no query, headers or body.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// A `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// A `POST` request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// A `PATCH` request.
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    /// Append query pairs.
    pub fn with_query(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Set a header. The name is lower-cased.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Set the idempotency key header.
    pub fn with_idempotency_key(self, key: impl Into<String>) -> Self {
        self.with_header(IDEMPOTENCY_KEY_HEADER, key)
    }

    /// Serialize `body` as the JSON payload.
    ///
    /// # Errors
    ///
    /// Returns a JSON error if `body` cannot be serialized.
    #[track_caller]
    pub fn with_json<B: serde::Serialize + ?Sized>(mut self, body: &B) -> PaylineResult<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| PaylineError::from(JsonError::from_serde(&e, "request body")))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Value of a per-request header.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// A response as returned by a [`Transport`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiResponse {
    /// HTTP status
    pub status: u16,
    /// Response headers, lower-cased names
    pub headers: HashMap<String, String>,
    /// Raw body
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Build a response.
    pub fn new(status: u16, headers: HashMap<String, String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: headers
                .into_iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), v))
                .collect(),
            body: body.into(),
        }
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Value of a response header.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns a JSON error naming the target type when decoding fails.
    #[track_caller]
    pub fn json<T: DeserializeOwned>(&self) -> PaylineResult<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            PaylineError::from(JsonError::from_serde(&e, std::any::type_name::<T>()))
        })
    }
}

/// Sends requests and returns raw responses.
///
/// Implementations report any received response, whatever its status, as
/// `Ok`; `Err` means no response arrived.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request.
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, HttpError>;
}

/// [`Transport`] over a `reqwest::Client`.
///
/// Adds the client-wide headers to every request:
/// - `Authorization: Basic base64(secret_key + ":")`
/// - `User-Agent`
/// - `api-version` and `for-user-id` when configured
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
    authorization: String,
    api_version: Option<String>,
    for_user_id: Option<String>,
}

impl ReqwestTransport {
    /// Build a transport from API settings.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no secret key is set or the HTTP
    /// client cannot be built.
    #[instrument(skip(config), fields(base_url = %config.base_url))]
    pub fn new(config: &ApiConfig) -> PaylineResult<Self> {
        let secret_key = config.require_secret_key()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(user_agent())
            .build()
            .map_err(|e| {
                PaylineError::from(ConfigError::new(format!(
                    "Failed to build HTTP client: {}",
                    e
                )))
            })?;
        debug!("Created reqwest transport");
        Ok(Self::with_client(client, config, secret_key))
    }

    /// Build a transport around an existing client.
    pub fn with_client(client: reqwest::Client, config: &ApiConfig, secret_key: &str) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            authorization: basic_auth(secret_key),
            api_version: config.api_version.clone(),
            for_user_id: config.for_user_id.clone(),
        }
    }

    /// API root requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("for_user_id", &self.for_user_id)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, HttpError> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!(url = %url, "Sending request");

        let mut builder = self
            .client
            .request(request.method.into(), &url)
            .header(reqwest::header::AUTHORIZATION, &self.authorization);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(version) = &self.api_version {
            builder = builder.header("api-version", version);
        }
        if let Some(user_id) = &self.for_user_id {
            builder = builder.header("for-user-id", user_id);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            error!(error = %e, "Request failed before a response arrived");
            if e.is_timeout() {
                HttpError::timeout(format!("Request to {} timed out: {}", url, e))
            } else {
                HttpError::new(format!("Request to {} failed: {}", url, e))
            }
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(|e| {
            error!(error = %e, "Failed to read response body");
            HttpError::new(format!("Failed to read response body from {}: {}", url, e))
        })?;

        debug!(status, bytes = body.len(), "Received response");
        Ok(ApiResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

/// `User-Agent` sent with every request.
pub fn user_agent() -> String {
    format!("payline-rust/{}", env!("CARGO_PKG_VERSION"))
}

/// `Authorization` value for a secret key: the key is the Basic auth
/// username and the password is empty.
///
/// # Examples
///
/// ```
/// use payline_client::basic_auth;
///
/// assert_eq!(basic_auth("sk_test"), "Basic c2tfdGVzdDo=");
/// ```
pub fn basic_auth(secret_key: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{}:", secret_key)))
}
