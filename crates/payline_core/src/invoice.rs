//! Invoice resources.

use crate::{Identifiable, Metadata, Validate, Violations};
use chrono::{DateTime, Utc};
use payline_error::PaylineResult;
use serde::{Deserialize, Serialize};

/// Longest invoice lifetime the API accepts, in seconds (one year).
const MAX_INVOICE_DURATION_SECS: u32 = 31_536_000;

/// Lifecycle state of an invoice.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    /// Awaiting payment
    Pending,
    /// Paid by the payer
    Paid,
    /// Funds settled to the merchant
    Settled,
    /// Expired unpaid
    Expired,
}

/// A line item on an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    /// Item name
    pub name: String,
    /// Units purchased
    pub quantity: u32,
    /// Unit price
    pub price: f64,
    /// Optional category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// An invoice as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct Invoice {
    /// Server-assigned id
    id: String,
    /// Merchant-side reference
    external_id: String,
    /// Current state
    status: InvoiceStatus,
    /// Amount due
    amount: f64,
    /// ISO-4217 currency
    #[serde(default)]
    currency: Option<String>,
    /// Payer email
    #[serde(default)]
    payer_email: Option<String>,
    /// Free text description
    #[serde(default)]
    description: Option<String>,
    /// Hosted checkout page
    #[serde(default)]
    invoice_url: Option<String>,
    /// When the invoice stops accepting payment
    #[serde(default)]
    expiry_date: Option<DateTime<Utc>>,
    /// Line items
    #[serde(default)]
    items: Vec<InvoiceItem>,
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

impl Identifiable for Invoice {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Payload for creating an invoice.
///
/// # Examples
///
/// ```
/// use payline_core::{CreateInvoiceRequestBuilder, Validate};
///
/// let request = CreateInvoiceRequestBuilder::default()
///     .external_id("order-77")
///     .amount(150_000.0)
///     .currency("IDR")
///     .payer_email("buyer@example.com")
///     .build()
///     .unwrap();
/// assert!(request.validate().is_ok());
///
/// let bad = CreateInvoiceRequestBuilder::default()
///     .external_id("order-78")
///     .amount(0.0)
///     .build()
///     .unwrap();
/// assert!(bad.validate().is_err());
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
pub struct CreateInvoiceRequest {
    /// Merchant-side reference
    #[builder(setter(into))]
    external_id: String,
    /// Amount due
    amount: f64,
    /// ISO-4217 currency (server default when unset)
    #[builder(default, setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    currency: Option<String>,
    /// Payer email
    #[builder(default, setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payer_email: Option<String>,
    /// Free text description
    #[builder(default, setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    /// Lifetime in seconds
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    invoice_duration: Option<u32>,
    /// Line items
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    items: Vec<InvoiceItem>,
    /// Redirect after successful payment
    #[builder(default, setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    success_redirect_url: Option<String>,
    /// Redirect after failed payment
    #[builder(default, setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    failure_redirect_url: Option<String>,
    /// Merchant metadata
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    metadata: Metadata,
}

impl Validate for CreateInvoiceRequest {
    fn validate(&self) -> PaylineResult<()> {
        let mut v = Violations::new();
        v.non_empty("external_id", &self.external_id)
            .max_len("external_id", &self.external_id, 255)
            .positive("amount", self.amount)
            .email("payer_email", self.payer_email.as_deref())
            .url("success_redirect_url", self.success_redirect_url.as_deref())
            .url("failure_redirect_url", self.failure_redirect_url.as_deref());
        if let Some(currency) = &self.currency {
            v.currency("currency", currency);
        }
        if let Some(duration) = self.invoice_duration {
            v.check(
                (1..=MAX_INVOICE_DURATION_SECS).contains(&duration),
                "invoice_duration",
                "must be between 1 second and 1 year",
            );
        }
        for (i, item) in self.items.iter().enumerate() {
            v.non_empty(&format!("items[{}].name", i), &item.name)
                .check(
                    item.quantity > 0,
                    &format!("items[{}].quantity", i),
                    "must be at least 1",
                )
                .check(
                    item.price.is_finite() && item.price >= 0.0,
                    &format!("items[{}].price", i),
                    "must not be negative",
                );
        }
        v.finish()
    }
}
