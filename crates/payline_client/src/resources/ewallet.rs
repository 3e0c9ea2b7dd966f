//! E-wallet charge endpoints.

use super::{create, require_id};
use crate::{ApiRequest, PaylineClient};
use payline_core::{CreateEwalletChargeRequest, EwalletCharge};
use payline_error::PaylineResult;
use tracing::instrument;

const PATH: &str = "/ewallets/charges";

/// Client for `/ewallets/charges`.
#[derive(Debug, Clone)]
pub struct EwalletCharges {
    client: PaylineClient,
}

impl EwalletCharges {
    pub(crate) fn new(client: PaylineClient) -> Self {
        Self { client }
    }

    /// Create a charge.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any request is made if `request`
    /// is malformed, otherwise any pipeline error.
    #[instrument(skip(self, request), fields(reference_id = %request.reference_id()))]
    pub async fn create(&self, request: &CreateEwalletChargeRequest) -> PaylineResult<EwalletCharge> {
        create(&self.client, PATH, request, None).await
    }

    /// Create a charge under a caller-chosen idempotency key.
    #[instrument(skip(self, request))]
    pub async fn create_idempotent(
        &self,
        request: &CreateEwalletChargeRequest,
        idempotency_key: &str,
    ) -> PaylineResult<EwalletCharge> {
        create(&self.client, PATH, request, Some(idempotency_key)).await
    }

    /// Fetch a charge by id.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> PaylineResult<EwalletCharge> {
        let id = require_id("id", id)?;
        self.client
            .execute(ApiRequest::get(format!("{}/{}", PATH, id)))
            .await
    }

    /// Void a charge that has not settled yet.
    #[instrument(skip(self))]
    pub async fn void(&self, id: &str) -> PaylineResult<EwalletCharge> {
        let id = require_id("id", id)?;
        self.client
            .execute(ApiRequest::post(format!("{}/{}/void", PATH, id)))
            .await
    }
}
