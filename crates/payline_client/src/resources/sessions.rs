//! Payment session endpoints.

use super::{create, require_id};
use crate::{ApiRequest, PaylineClient};
use payline_core::{CreateSessionRequest, Session};
use payline_error::PaylineResult;
use tracing::instrument;

const PATH: &str = "/sessions";

/// Client for `/sessions`.
#[derive(Debug, Clone)]
pub struct Sessions {
    client: PaylineClient,
}

impl Sessions {
    pub(crate) fn new(client: PaylineClient) -> Self {
        Self { client }
    }

    /// Open a payment session.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any request is made if `request`
    /// is malformed, otherwise any pipeline error.
    #[instrument(skip(self, request), fields(reference_id = %request.reference_id()))]
    pub async fn create(&self, request: &CreateSessionRequest) -> PaylineResult<Session> {
        create(&self.client, PATH, request, None).await
    }

    /// Open a session under a caller-chosen idempotency key.
    #[instrument(skip(self, request))]
    pub async fn create_idempotent(
        &self,
        request: &CreateSessionRequest,
        idempotency_key: &str,
    ) -> PaylineResult<Session> {
        create(&self.client, PATH, request, Some(idempotency_key)).await
    }

    /// Fetch a session by id.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> PaylineResult<Session> {
        let id = require_id("id", id)?;
        self.client
            .execute(ApiRequest::get(format!("{}/{}", PATH, id)))
            .await
    }

    /// Cancel an active session.
    #[instrument(skip(self))]
    pub async fn cancel(&self, id: &str) -> PaylineResult<Session> {
        let id = require_id("id", id)?;
        self.client
            .execute(ApiRequest::post(format!("{}/{}/cancel", PATH, id)))
            .await
    }
}
