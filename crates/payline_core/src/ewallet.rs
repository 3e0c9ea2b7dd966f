//! E-wallet charge resources.

use crate::{Identifiable, Metadata, Validate, Violations};
use chrono::{DateTime, Utc};
use payline_error::PaylineResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lifecycle state of an e-wallet charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ChargeStatus {
    /// Awaiting payer authorisation
    Pending,
    /// Captured
    Succeeded,
    /// Declined or abandoned
    Failed,
    /// Voided before settlement
    Voided,
    /// Refunded after settlement
    Refunded,
}

/// How the charge is funded, tagged on the wire by `checkout_method`.
///
/// ```json
/// { "checkout_method": "ONE_TIME_PAYMENT", "channel_code": "ID_OVO",
///   "channel_properties": { "mobile_number": "+628123456789" } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "checkout_method", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChargeSource {
    /// Payer authorises this single charge in their wallet app
    OneTimePayment {
        /// Wallet channel, e.g. `ID_OVO`
        channel_code: String,
        /// Channel-specific properties such as return URLs
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        channel_properties: BTreeMap<String, String>,
    },
    /// Charge a previously linked wallet
    TokenizedPayment {
        /// Linked payment method
        payment_method_id: String,
        /// Optional channel properties
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        channel_properties: BTreeMap<String, String>,
    },
}

/// Redirect targets the payer follows to authorise a charge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChargeActions {
    /// Desktop checkout page
    #[serde(default)]
    pub desktop_web_checkout_url: Option<String>,
    /// Mobile web checkout page
    #[serde(default)]
    pub mobile_web_checkout_url: Option<String>,
    /// App deeplink
    #[serde(default)]
    pub mobile_deeplink_checkout_url: Option<String>,
    /// QR string for scan-to-pay wallets
    #[serde(default)]
    pub qr_checkout_string: Option<String>,
}

/// An e-wallet charge as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct EwalletCharge {
    /// Server-assigned id
    id: String,
    /// Merchant-side reference
    reference_id: String,
    /// Current state
    status: ChargeStatus,
    /// ISO-4217 currency
    currency: String,
    /// Amount requested
    charge_amount: f64,
    /// Amount captured so far
    #[serde(default)]
    capture_amount: Option<f64>,
    /// Funding source
    #[serde(flatten)]
    source: ChargeSource,
    /// Redirect targets
    #[serde(default)]
    actions: Option<ChargeActions>,
    /// Whether the payer must be redirected
    #[serde(default)]
    is_redirect_required: bool,
    /// Void outcome, when a void was requested
    #[serde(default)]
    void_status: Option<String>,
    /// When the charge was voided
    #[serde(default)]
    voided_at: Option<DateTime<Utc>>,
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

impl Identifiable for EwalletCharge {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Payload for creating an e-wallet charge.
///
/// # Examples
///
/// ```
/// use payline_core::{ChargeSource, CreateEwalletChargeRequestBuilder, Validate};
/// use std::collections::BTreeMap;
///
/// let request = CreateEwalletChargeRequestBuilder::default()
///     .reference_id("order-9")
///     .currency("IDR")
///     .amount(25_000.0)
///     .source(ChargeSource::TokenizedPayment {
///         payment_method_id: String::new(),
///         channel_properties: BTreeMap::new(),
///     })
///     .build()
///     .unwrap();
///
/// let err = request.validate().unwrap_err();
/// assert_eq!(err.as_validation().unwrap().field(), "payment_method_id");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
pub struct CreateEwalletChargeRequest {
    /// Merchant-side reference
    #[builder(setter(into))]
    reference_id: String,
    /// ISO-4217 currency
    #[builder(setter(into))]
    currency: String,
    /// Amount to charge
    amount: f64,
    /// Funding source
    #[serde(flatten)]
    source: ChargeSource,
    /// Customer the charge belongs to
    #[builder(default, setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    customer_id: Option<String>,
    /// Merchant metadata
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    metadata: Metadata,
}

impl Validate for CreateEwalletChargeRequest {
    fn validate(&self) -> PaylineResult<()> {
        let mut v = Violations::new();
        v.non_empty("reference_id", &self.reference_id)
            .currency("currency", &self.currency)
            .positive("amount", self.amount);
        match &self.source {
            ChargeSource::OneTimePayment { channel_code, .. } => {
                v.non_empty("channel_code", channel_code);
            }
            ChargeSource::TokenizedPayment {
                payment_method_id, ..
            } => {
                v.non_empty("payment_method_id", payment_method_id);
            }
        }
        v.finish()
    }
}
