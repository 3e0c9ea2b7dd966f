//! Typed resource clients.
//!
//! Each client is a cheap handle over a [`PaylineClient`]. Write calls
//! validate their payload locally before anything reaches the rate limiter;
//! list calls go through a [`PaginationEngine`] backed by [`ListFetcher`].

mod customers;
mod ewallet;
mod invoices;
mod payment_methods;
mod sessions;

pub use customers::Customers;
pub use ewallet::EwalletCharges;
pub use invoices::Invoices;
pub use payment_methods::PaymentMethods;
pub use sessions::Sessions;

use crate::{ApiRequest, PaylineClient};
use async_trait::async_trait;
use payline_core::{Identifiable, ListEnvelope, Page, PageRequest, Validate};
use payline_error::{PaylineResult, ValidationError};
use payline_pagination::{PageFetcher, PaginationEngine};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use tracing::debug;

/// Pagination engine over one list endpoint.
pub type ResourceEngine<T> = PaginationEngine<T, ListFetcher<T>>;

/// [`PageFetcher`] that `GET`s a list endpoint through the request pipeline.
pub struct ListFetcher<T> {
    client: PaylineClient,
    path: String,
    _item: PhantomData<fn() -> T>,
}

impl<T> ListFetcher<T> {
    /// Fetch pages of `path` with `client`.
    pub fn new(client: PaylineClient, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
            _item: PhantomData,
        }
    }

    /// List endpoint path.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl<T> std::fmt::Debug for ListFetcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListFetcher")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<T> PageFetcher<T> for ListFetcher<T>
where
    T: DeserializeOwned + Identifiable + Send + 'static,
{
    async fn fetch_page(&self, request: &PageRequest) -> PaylineResult<Page<T>> {
        let api_request = ApiRequest::get(self.path.as_str()).with_query(request.query_pairs());
        let envelope: ListEnvelope<T> = self.client.execute(api_request).await?;
        let page = envelope.into_page();
        debug!(path = %self.path, items = page.len(), has_more = page.has_more, "Fetched page");
        Ok(page)
    }
}

pub(crate) fn engine<T>(client: &PaylineClient, path: &str) -> ResourceEngine<T>
where
    T: DeserializeOwned + Identifiable + Send + 'static,
{
    PaginationEngine::new(ListFetcher::new(client.clone(), path))
}

/// Reject ids that are blank or would escape their path segment.
pub(crate) fn require_id<'a>(field: &str, id: &'a str) -> PaylineResult<&'a str> {
    if id.trim().is_empty() {
        return Err(ValidationError::single(field, "must not be empty").into());
    }
    if id.contains('/') || id.contains('?') || id.contains('#') {
        return Err(ValidationError::single(field, "must be a single path segment").into());
    }
    Ok(id)
}

/// Validate `body` and `POST` it with an idempotency key.
///
/// A fresh UUID v4 key is generated when the caller supplies none.
pub(crate) async fn create<B, T>(
    client: &PaylineClient,
    path: &str,
    body: &B,
    idempotency_key: Option<&str>,
) -> PaylineResult<T>
where
    B: Validate + Serialize,
    T: DeserializeOwned,
{
    body.validate()?;
    let key = match idempotency_key {
        Some(key) if key.trim().is_empty() => {
            return Err(ValidationError::single("idempotency_key", "must not be empty").into());
        }
        Some(key) => key.to_string(),
        None => uuid::Uuid::new_v4().to_string(),
    };
    let request = ApiRequest::post(path)
        .with_idempotency_key(key)
        .with_json(body)?;
    client.execute(request).await
}
