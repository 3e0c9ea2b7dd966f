//! Payment method endpoints.

use super::{ListFetcher, ResourceEngine, create, engine, require_id};
use crate::{ApiRequest, PaylineClient};
use payline_core::{
    CreatePaymentMethodRequest, CursorOptions, Page, PaymentMethod, UpdatePaymentMethodRequest,
    Validate,
};
use payline_error::PaylineResult;
use payline_pagination::{FetchAllOptions, ItemStream, Paginator};
use tracing::instrument;

const PATH: &str = "/v2/payment_methods";

/// Client for `/v2/payment_methods`.
#[derive(Debug, Clone)]
pub struct PaymentMethods {
    client: PaylineClient,
}

impl PaymentMethods {
    pub(crate) fn new(client: PaylineClient) -> Self {
        Self { client }
    }

    /// Create a payment method.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any request is made if `request`
    /// is malformed, otherwise any pipeline error.
    #[instrument(skip(self, request))]
    pub async fn create(&self, request: &CreatePaymentMethodRequest) -> PaylineResult<PaymentMethod> {
        create(&self.client, PATH, request, None).await
    }

    /// Create a payment method under a caller-chosen idempotency key.
    #[instrument(skip(self, request))]
    pub async fn create_idempotent(
        &self,
        request: &CreatePaymentMethodRequest,
        idempotency_key: &str,
    ) -> PaylineResult<PaymentMethod> {
        create(&self.client, PATH, request, Some(idempotency_key)).await
    }

    /// Fetch a payment method by id.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> PaylineResult<PaymentMethod> {
        let id = require_id("id", id)?;
        self.client
            .execute(ApiRequest::get(format!("{}/{}", PATH, id)))
            .await
    }

    /// Apply a partial update.
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: &str,
        request: &UpdatePaymentMethodRequest,
    ) -> PaylineResult<PaymentMethod> {
        let id = require_id("id", id)?;
        request.validate()?;
        let api_request = ApiRequest::patch(format!("{}/{}", PATH, id)).with_json(request)?;
        self.client.execute(api_request).await
    }

    /// Expire a payment method so it can no longer be charged.
    #[instrument(skip(self))]
    pub async fn expire(&self, id: &str) -> PaylineResult<PaymentMethod> {
        let id = require_id("id", id)?;
        self.client
            .execute(ApiRequest::post(format!("{}/{}/expire", PATH, id)))
            .await
    }

    /// Fetch one page of payment methods.
    pub async fn list(&self, options: &CursorOptions) -> PaylineResult<Page<PaymentMethod>> {
        self.engine().fetch_single_page(options).await
    }

    /// Fetch one page of the payment methods owned by `customer_id`.
    pub async fn list_for_customer(
        &self,
        customer_id: &str,
        options: &CursorOptions,
    ) -> PaylineResult<Page<PaymentMethod>> {
        let customer_id = require_id("customer_id", customer_id)?;
        self.list(&options.clone().with_param("customer_id", customer_id))
            .await
    }

    /// Fetch every payment method within the bounds of `options`.
    pub async fn list_all(&self, options: &FetchAllOptions) -> PaylineResult<Vec<PaymentMethod>> {
        self.engine().fetch_all_pages(options).await
    }

    /// A resumable paginator over payment methods.
    pub fn paginator(
        &self,
        initial: CursorOptions,
    ) -> Paginator<PaymentMethod, ListFetcher<PaymentMethod>> {
        self.engine().paginator(initial)
    }

    /// Lazily stream payment methods, stopping after `max_items` when set.
    pub fn iterate(
        &self,
        options: CursorOptions,
        max_items: Option<usize>,
    ) -> ItemStream<PaymentMethod> {
        self.engine().iterate_items(options, max_items)
    }

    /// The pagination engine behind the list calls.
    pub fn engine(&self) -> ResourceEngine<PaymentMethod> {
        engine(&self.client, PATH)
    }
}
