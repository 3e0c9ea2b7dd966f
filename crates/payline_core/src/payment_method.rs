//! Payment method resources.

use crate::{Identifiable, Metadata, Validate, Violations};
use chrono::{DateTime, Utc};
use payline_error::PaylineResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Whether a payment method can be charged more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Reusability {
    /// Single charge, then expires
    OneTimeUse,
    /// Stored for repeated charges
    MultipleUse,
}

/// Lifecycle state of a payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethodStatus {
    /// Usable for charges
    Active,
    /// Disabled by the merchant
    Inactive,
    /// Awaiting activation
    Pending,
    /// Payer must complete an action (e.g. account linking)
    RequiresAction,
    /// Expired
    Expired,
    /// Activation failed
    Failed,
}

/// Card details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardParams {
    /// ISO-4217 currency
    pub currency: String,
    /// Tokenized card reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    /// Name on the card
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardholder_name: Option<String>,
}

/// Channel-routed details shared by e-wallets and direct debit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelParams {
    /// Provider channel, e.g. `OVO` or `BRI`
    pub channel_code: String,
    /// Channel-specific properties, e.g. `success_return_url`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub channel_properties: BTreeMap<String, String>,
}

/// Virtual account details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualAccountParams {
    /// Issuing bank channel
    pub channel_code: String,
    /// Name displayed to the payer
    pub customer_name: String,
    /// Fixed amount, open amount when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// ISO-4217 currency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Expiry of the account number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// QR code details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrCodeParams {
    /// QR network channel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_code: Option<String>,
    /// Fixed amount, open amount when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// ISO-4217 currency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Payment method kind, tagged on the wire by `type`.
///
/// ```json
/// { "type": "EWALLET", "ewallet": { "channel_code": "OVO" } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethodDetails {
    /// Credit or debit card
    Card {
        /// Card details
        card: CardParams,
    },
    /// E-wallet account
    Ewallet {
        /// Channel details
        ewallet: ChannelParams,
    },
    /// Bank direct debit
    DirectDebit {
        /// Channel details
        direct_debit: ChannelParams,
    },
    /// Bank virtual account
    VirtualAccount {
        /// Account details
        virtual_account: VirtualAccountParams,
    },
    /// QR code
    QrCode {
        /// QR details
        qr_code: QrCodeParams,
    },
}

impl PaymentMethodDetails {
    fn validate_into(&self, v: &mut Violations) {
        match self {
            PaymentMethodDetails::Card { card } => {
                v.currency("card.currency", &card.currency);
            }
            PaymentMethodDetails::Ewallet { ewallet } => {
                v.non_empty("ewallet.channel_code", &ewallet.channel_code);
            }
            PaymentMethodDetails::DirectDebit { direct_debit } => {
                v.non_empty("direct_debit.channel_code", &direct_debit.channel_code);
            }
            PaymentMethodDetails::VirtualAccount { virtual_account } => {
                v.non_empty(
                    "virtual_account.channel_code",
                    &virtual_account.channel_code,
                )
                .non_empty(
                    "virtual_account.customer_name",
                    &virtual_account.customer_name,
                );
                if let Some(amount) = virtual_account.amount {
                    v.positive("virtual_account.amount", amount);
                }
                if let Some(currency) = &virtual_account.currency {
                    v.currency("virtual_account.currency", currency);
                }
            }
            PaymentMethodDetails::QrCode { qr_code } => {
                if let Some(amount) = qr_code.amount {
                    v.positive("qr_code.amount", amount);
                }
                if let Some(currency) = &qr_code.currency {
                    v.currency("qr_code.currency", currency);
                }
            }
        }
    }
}

/// A payment method as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct PaymentMethod {
    /// Server-assigned id
    id: String,
    /// Owning customer
    #[serde(default)]
    customer_id: Option<String>,
    /// Merchant-side reference
    #[serde(default)]
    reference_id: Option<String>,
    /// One-time or reusable
    reusability: Reusability,
    /// Current state
    status: PaymentMethodStatus,
    /// Type-specific details
    #[serde(flatten)]
    details: PaymentMethodDetails,
    /// Free text description
    #[serde(default)]
    description: Option<String>,
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

impl Identifiable for PaymentMethod {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Payload for creating a payment method.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
pub struct CreatePaymentMethodRequest {
    /// Type-specific details
    #[serde(flatten)]
    details: PaymentMethodDetails,
    /// One-time or reusable
    reusability: Reusability,
    /// Owning customer, required for reusable methods
    #[builder(default, setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    customer_id: Option<String>,
    /// Merchant-side reference
    #[builder(default, setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reference_id: Option<String>,
    /// Free text description
    #[builder(default, setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    /// Merchant metadata
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    metadata: Metadata,
}

impl Validate for CreatePaymentMethodRequest {
    fn validate(&self) -> PaylineResult<()> {
        let mut v = Violations::new();
        v.check(
            self.reusability == Reusability::OneTimeUse || self.customer_id.is_some(),
            "customer_id",
            "is required for MULTIPLE_USE payment methods",
        );
        if let Some(customer_id) = &self.customer_id {
            v.non_empty("customer_id", customer_id);
        }
        self.details.validate_into(&mut v);
        v.finish()
    }
}

/// Partial update of a payment method.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(default)]
pub struct UpdatePaymentMethodRequest {
    /// New state, only `ACTIVE` or `INACTIVE`
    #[builder(setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<PaymentMethodStatus>,
    /// New reference
    #[builder(setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reference_id: Option<String>,
    /// New description
    #[builder(setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    /// Replacement metadata
    #[builder(setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Metadata>,
}

impl Validate for UpdatePaymentMethodRequest {
    fn validate(&self) -> PaylineResult<()> {
        let mut v = Violations::new();
        v.check(
            self.status.is_some()
                || self.reference_id.is_some()
                || self.description.is_some()
                || self.metadata.is_some(),
            "update",
            "must set at least one field",
        );
        if let Some(status) = self.status {
            v.check(
                matches!(
                    status,
                    PaymentMethodStatus::Active | PaymentMethodStatus::Inactive
                ),
                "status",
                "can only be set to ACTIVE or INACTIVE",
            );
        }
        v.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reusable_requires_customer() {
        let request = CreatePaymentMethodRequestBuilder::default()
            .details(PaymentMethodDetails::Ewallet {
                ewallet: ChannelParams {
                    channel_code: "OVO".to_string(),
                    channel_properties: BTreeMap::new(),
                },
            })
            .reusability(Reusability::MultipleUse)
            .build()
            .unwrap();
        let err = request.validate().unwrap_err();
        assert_eq!(err.as_validation().unwrap().field(), "customer_id");
    }

    #[test]
    fn test_details_serialize_with_type_tag() {
        let details = PaymentMethodDetails::DirectDebit {
            direct_debit: ChannelParams {
                channel_code: "BRI".to_string(),
                channel_properties: BTreeMap::new(),
            },
        };
        let value = serde_json::to_value(&details).unwrap();
        assert_eq!(value["type"], "DIRECT_DEBIT");
        assert_eq!(value["direct_debit"]["channel_code"], "BRI");
    }
}
