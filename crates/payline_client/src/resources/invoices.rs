//! Invoice endpoints.

use super::{ListFetcher, ResourceEngine, create, engine, require_id};
use crate::{ApiRequest, PaylineClient};
use payline_core::{CreateInvoiceRequest, CursorOptions, Invoice, InvoiceStatus, Page};
use payline_error::PaylineResult;
use payline_pagination::{FetchAllOptions, ItemStream, Paginator};
use tracing::instrument;

const PATH: &str = "/invoices";

/// Client for `/invoices`.
#[derive(Debug, Clone)]
pub struct Invoices {
    client: PaylineClient,
}

impl Invoices {
    pub(crate) fn new(client: PaylineClient) -> Self {
        Self { client }
    }

    /// Create an invoice.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any request is made if `request`
    /// is malformed, otherwise any pipeline error.
    #[instrument(skip(self, request), fields(external_id = %request.external_id()))]
    pub async fn create(&self, request: &CreateInvoiceRequest) -> PaylineResult<Invoice> {
        create(&self.client, PATH, request, None).await
    }

    /// Create an invoice under a caller-chosen idempotency key.
    #[instrument(skip(self, request))]
    pub async fn create_idempotent(
        &self,
        request: &CreateInvoiceRequest,
        idempotency_key: &str,
    ) -> PaylineResult<Invoice> {
        create(&self.client, PATH, request, Some(idempotency_key)).await
    }

    /// Fetch an invoice by id.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> PaylineResult<Invoice> {
        let id = require_id("id", id)?;
        self.client
            .execute(ApiRequest::get(format!("{}/{}", PATH, id)))
            .await
    }

    /// Expire a pending invoice so it no longer accepts payment.
    #[instrument(skip(self))]
    pub async fn expire(&self, id: &str) -> PaylineResult<Invoice> {
        let id = require_id("id", id)?;
        self.client
            .execute(ApiRequest::post(format!("{}/{}/expire", PATH, id)))
            .await
    }

    /// Fetch one page of invoices.
    pub async fn list(&self, options: &CursorOptions) -> PaylineResult<Page<Invoice>> {
        self.engine().fetch_single_page(options).await
    }

    /// Fetch one page of invoices in any of `statuses`.
    pub async fn list_by_status(
        &self,
        statuses: &[InvoiceStatus],
        options: &CursorOptions,
    ) -> PaylineResult<Page<Invoice>> {
        self.list(&Self::with_statuses(options, statuses)).await
    }

    /// Add the `statuses` filter to `options` as a comma separated list.
    ///
    /// An empty `statuses` leaves the options untouched.
    pub fn with_statuses(options: &CursorOptions, statuses: &[InvoiceStatus]) -> CursorOptions {
        if statuses.is_empty() {
            return options.clone();
        }
        let joined = statuses
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        options.clone().with_param("statuses", joined)
    }

    /// Fetch every invoice within the bounds of `options`.
    pub async fn list_all(&self, options: &FetchAllOptions) -> PaylineResult<Vec<Invoice>> {
        self.engine().fetch_all_pages(options).await
    }

    /// A resumable paginator over invoices.
    pub fn paginator(&self, initial: CursorOptions) -> Paginator<Invoice, ListFetcher<Invoice>> {
        self.engine().paginator(initial)
    }

    /// Lazily stream invoices, stopping after `max_items` when set.
    pub fn iterate(&self, options: CursorOptions, max_items: Option<usize>) -> ItemStream<Invoice> {
        self.engine().iterate_items(options, max_items)
    }

    /// The pagination engine behind the list calls.
    pub fn engine(&self) -> ResourceEngine<Invoice> {
        engine(&self.client, PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statuses_filter_is_comma_joined() {
        let options = Invoices::with_statuses(
            &CursorOptions::new().with_limit(5),
            &[InvoiceStatus::Pending, InvoiceStatus::Paid],
        );
        assert_eq!(
            options.params.get("statuses").map(String::as_str),
            Some("PENDING,PAID")
        );
        assert_eq!(options.limit, Some(5));
    }

    #[test]
    fn test_empty_statuses_adds_nothing() {
        let options = Invoices::with_statuses(&CursorOptions::new(), &[]);
        assert!(options.params.is_empty());
    }
}
