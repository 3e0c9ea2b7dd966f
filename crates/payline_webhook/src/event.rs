//! Webhook event envelope.

use chrono::{DateTime, Utc};
use payline_error::{PaylineResult, WebhookError, WebhookErrorKind};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A webhook notification.
///
/// `data` is kept as raw JSON by default; decode it with
/// [`WebhookEvent::data_as`] once `event` says what it holds.
///
/// ```json
/// {
///   "id": "evt_1",
///   "event": "invoice.paid",
///   "business_id": "biz_9",
///   "created": "2024-05-01T10:00:00Z",
///   "data": { "id": "inv_1", "status": "PAID" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEvent<T = serde_json::Value> {
    /// Event id, stable across redeliveries
    #[serde(default)]
    pub id: Option<String>,
    /// Event type, e.g. `invoice.paid`
    pub event: String,
    /// Account the event belongs to
    #[serde(default)]
    pub business_id: Option<String>,
    /// When the event happened
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    /// Event payload
    pub data: T,
}

impl WebhookEvent {
    /// Decode an event from a raw request body.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookErrorKind::InvalidPayload`] when the body is not an
    /// event envelope.
    ///
    /// # Examples
    ///
    /// ```
    /// use payline_webhook::WebhookEvent;
    ///
    /// let event = WebhookEvent::parse(br#"{"event":"session.completed","data":{}}"#).unwrap();
    /// assert_eq!(event.event, "session.completed");
    /// assert!(event.is("session.completed"));
    /// ```
    pub fn parse(body: &[u8]) -> PaylineResult<Self> {
        serde_json::from_slice(body).map_err(|e| {
            WebhookError::new(WebhookErrorKind::InvalidPayload(e.to_string())).into()
        })
    }

    /// Decode `data` as `U`.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookErrorKind::InvalidPayload`] when `data` does not
    /// match `U`.
    pub fn data_as<U: DeserializeOwned>(&self) -> PaylineResult<U> {
        serde_json::from_value(self.data.clone()).map_err(|e| {
            WebhookError::new(WebhookErrorKind::InvalidPayload(format!(
                "{} for {}: {}",
                self.event,
                std::any::type_name::<U>(),
                e
            )))
            .into()
        })
    }
}

impl<T> WebhookEvent<T> {
    /// True when the event type equals `event`.
    pub fn is(&self, event: &str) -> bool {
        self.event == event
    }
}
