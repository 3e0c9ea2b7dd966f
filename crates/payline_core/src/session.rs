//! Payment session resources.

use crate::{Identifiable, Metadata, Validate, Violations};
use chrono::{DateTime, Utc};
use payline_error::PaylineResult;
use serde::{Deserialize, Serialize};

/// What the session collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionType {
    /// Save a payment method for later
    Save,
    /// Collect a payment now
    Pay,
}

/// How the payer interacts with the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionMode {
    /// Hosted payment link
    PaymentLink,
    /// Embedded UI components
    Components,
}

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    /// Open for the payer
    Active,
    /// Payer finished the flow
    Completed,
    /// Timed out
    Expired,
    /// Cancelled by the merchant
    Canceled,
}

/// A payment session as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct Session {
    /// Server-assigned id
    #[serde(alias = "payment_session_id")]
    id: String,
    /// Merchant-side reference
    reference_id: String,
    /// Customer the session is for
    #[serde(default)]
    customer_id: Option<String>,
    /// Save or pay
    session_type: SessionType,
    /// Link or components
    mode: SessionMode,
    /// ISO-4217 currency
    currency: String,
    /// Amount, for pay sessions
    #[serde(default)]
    amount: Option<f64>,
    /// ISO-3166 country
    country: String,
    /// Current state
    status: SessionStatus,
    /// Hosted page, for link mode
    #[serde(default)]
    payment_link_url: Option<String>,
    /// When the session stops accepting input
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
    /// Merchant metadata
    #[serde(default)]
    metadata: Metadata,
    /// Creation timestamp
    #[serde(default)]
    created: Option<DateTime<Utc>>,
    /// Last update timestamp
    #[serde(default)]
    updated: Option<DateTime<Utc>>,
}

impl Identifiable for Session {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Payload for creating a payment session.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
pub struct CreateSessionRequest {
    /// Merchant-side reference
    #[builder(setter(into))]
    reference_id: String,
    /// Save or pay
    session_type: SessionType,
    /// Link or components
    mode: SessionMode,
    /// ISO-4217 currency
    #[builder(setter(into))]
    currency: String,
    /// ISO-3166 country
    #[builder(setter(into))]
    country: String,
    /// Amount, required for pay sessions
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    amount: Option<f64>,
    /// Customer the session is for
    #[builder(default, setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    customer_id: Option<String>,
    /// Restrict to these channels
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    allowed_payment_channels: Vec<String>,
    /// Redirect after completion
    #[builder(default, setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    success_return_url: Option<String>,
    /// Redirect after cancellation
    #[builder(default, setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cancel_return_url: Option<String>,
    /// Free text description
    #[builder(default, setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    /// Merchant metadata
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    metadata: Metadata,
}

impl Validate for CreateSessionRequest {
    fn validate(&self) -> PaylineResult<()> {
        let mut v = Violations::new();
        v.non_empty("reference_id", &self.reference_id)
            .currency("currency", &self.currency)
            .country("country", &self.country)
            .url("success_return_url", self.success_return_url.as_deref())
            .url("cancel_return_url", self.cancel_return_url.as_deref());
        match (self.session_type, self.amount) {
            (SessionType::Pay, Some(amount)) => {
                v.positive("amount", amount);
            }
            (SessionType::Pay, None) => {
                v.check(false, "amount", "is required for PAY sessions");
            }
            (SessionType::Save, Some(amount)) => {
                v.check(amount == 0.0, "amount", "must be zero or unset for SAVE sessions");
            }
            (SessionType::Save, None) => {}
        }
        for (i, channel) in self.allowed_payment_channels.iter().enumerate() {
            v.non_empty(&format!("allowed_payment_channels[{}]", i), channel);
        }
        v.finish()
    }
}
