//! Customer endpoints.

use super::{ListFetcher, ResourceEngine, create, engine, require_id};
use crate::{ApiRequest, PaylineClient};
use payline_core::{
    CreateCustomerRequest, CursorOptions, Customer, Page, UpdateCustomerRequest, Validate,
};
use payline_error::PaylineResult;
use payline_pagination::{FetchAllOptions, ItemStream, Paginator};
use tracing::instrument;

const PATH: &str = "/customers";

/// Client for `/customers`.
#[derive(Debug, Clone)]
pub struct Customers {
    client: PaylineClient,
}

impl Customers {
    pub(crate) fn new(client: PaylineClient) -> Self {
        Self { client }
    }

    /// Create a customer under a generated idempotency key.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any request is made if `request`
    /// is malformed, otherwise any pipeline error.
    #[instrument(skip(self, request), fields(reference_id = %request.reference_id()))]
    pub async fn create(&self, request: &CreateCustomerRequest) -> PaylineResult<Customer> {
        create(&self.client, PATH, request, None).await
    }

    /// Create a customer under a caller-chosen idempotency key.
    ///
    /// Resubmitting with the same key returns the original customer.
    #[instrument(skip(self, request))]
    pub async fn create_idempotent(
        &self,
        request: &CreateCustomerRequest,
        idempotency_key: &str,
    ) -> PaylineResult<Customer> {
        create(&self.client, PATH, request, Some(idempotency_key)).await
    }

    /// Fetch a customer by id.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> PaylineResult<Customer> {
        let id = require_id("id", id)?;
        self.client
            .execute(ApiRequest::get(format!("{}/{}", PATH, id)))
            .await
    }

    /// Apply a partial update.
    #[instrument(skip(self, request))]
    pub async fn update(&self, id: &str, request: &UpdateCustomerRequest) -> PaylineResult<Customer> {
        let id = require_id("id", id)?;
        request.validate()?;
        let api_request = ApiRequest::patch(format!("{}/{}", PATH, id)).with_json(request)?;
        self.client.execute(api_request).await
    }

    /// Fetch one page of customers.
    pub async fn list(&self, options: &CursorOptions) -> PaylineResult<Page<Customer>> {
        self.engine().fetch_single_page(options).await
    }

    /// Fetch every customer within the bounds of `options`.
    pub async fn list_all(&self, options: &FetchAllOptions) -> PaylineResult<Vec<Customer>> {
        self.engine().fetch_all_pages(options).await
    }

    /// Customers carrying the given merchant reference.
    pub async fn find_by_reference(&self, reference_id: &str) -> PaylineResult<Vec<Customer>> {
        let reference_id = require_id("reference_id", reference_id)?;
        let options =
            FetchAllOptions::new(CursorOptions::new().with_param("reference_id", reference_id));
        self.list_all(&options).await
    }

    /// A resumable paginator over customers.
    pub fn paginator(&self, initial: CursorOptions) -> Paginator<Customer, ListFetcher<Customer>> {
        self.engine().paginator(initial)
    }

    /// Lazily stream customers, stopping after `max_items` when set.
    pub fn iterate(&self, options: CursorOptions, max_items: Option<usize>) -> ItemStream<Customer> {
        self.engine().iterate_items(options, max_items)
    }

    /// The pagination engine behind the list calls.
    pub fn engine(&self) -> ResourceEngine<Customer> {
        engine(&self.client, PATH)
    }
}
