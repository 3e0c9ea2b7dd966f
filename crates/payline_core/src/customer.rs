//! Customer resources.

use crate::{Identifiable, Metadata, Validate, Violations};
use chrono::{DateTime, NaiveDate, Utc};
use payline_error::PaylineResult;
use serde::{Deserialize, Serialize};

/// Personal details of an individual customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualDetail {
    /// First and middle names
    pub given_names: String,
    /// Family name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    /// ISO-3166 alpha-2 nationality
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    /// Date of birth
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
}

/// Registration details of a business customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessDetail {
    /// Registered business name
    pub business_name: String,
    /// Legal form, e.g. `CORPORATION`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_type: Option<String>,
    /// Date of registration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_registration: Option<NaiveDate>,
}

/// Customer kind, tagged on the wire by `type`.
///
/// ```json
/// { "type": "INDIVIDUAL", "individual_detail": { "given_names": "Ada" } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerProfile {
    /// A natural person
    Individual {
        /// Personal details
        individual_detail: IndividualDetail,
    },
    /// A company or other legal entity
    Business {
        /// Business details
        business_detail: BusinessDetail,
    },
}

impl CustomerProfile {
    fn validate_into(&self, v: &mut Violations) {
        match self {
            CustomerProfile::Individual { individual_detail } => {
                v.non_empty(
                    "individual_detail.given_names",
                    &individual_detail.given_names,
                );
                if let Some(nationality) = &individual_detail.nationality {
                    v.country("individual_detail.nationality", nationality);
                }
            }
            CustomerProfile::Business { business_detail } => {
                v.non_empty(
                    "business_detail.business_name",
                    &business_detail.business_name,
                );
            }
        }
    }
}

/// A customer as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct Customer {
    /// Server-assigned id
    id: String,
    /// Merchant-side reference
    reference_id: String,
    /// Individual or business details
    #[serde(flatten)]
    profile: CustomerProfile,
    /// Contact email
    #[serde(default)]
    email: Option<String>,
    /// Contact phone, E.164
    #[serde(default)]
    mobile_number: Option<String>,
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

impl Identifiable for Customer {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Payload for creating a customer.
///
/// # Examples
///
/// ```
/// use payline_core::{
///     CreateCustomerRequestBuilder, CustomerProfile, IndividualDetail, Validate,
/// };
///
/// let request = CreateCustomerRequestBuilder::default()
///     .reference_id("cust-0001")
///     .profile(CustomerProfile::Individual {
///         individual_detail: IndividualDetail {
///             given_names: "Ada".to_string(),
///             surname: Some("Lovelace".to_string()),
///             nationality: None,
///             date_of_birth: None,
///         },
///     })
///     .email("ada@example.com")
///     .build()
///     .unwrap();
///
/// assert!(request.validate().is_ok());
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
pub struct CreateCustomerRequest {
    /// Merchant-side reference, unique per customer
    #[builder(setter(into))]
    reference_id: String,
    /// Individual or business details
    #[serde(flatten)]
    profile: CustomerProfile,
    /// Contact email
    #[builder(default, setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    /// Contact phone, E.164
    #[builder(default, setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mobile_number: Option<String>,
    /// Free text description
    #[builder(default, setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    /// Merchant metadata
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    metadata: Metadata,
}

impl Validate for CreateCustomerRequest {
    fn validate(&self) -> PaylineResult<()> {
        let mut v = Violations::new();
        v.non_empty("reference_id", &self.reference_id)
            .max_len("reference_id", &self.reference_id, 255)
            .email("email", self.email.as_deref())
            .phone("mobile_number", self.mobile_number.as_deref());
        self.profile.validate_into(&mut v);
        v.finish()
    }
}

/// Partial update of a customer. Unset fields are left untouched.
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
pub struct UpdateCustomerRequest {
    /// New contact email
    #[builder(setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    /// New contact phone
    #[builder(setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mobile_number: Option<String>,
    /// New description
    #[builder(setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    /// Replacement individual details
    #[builder(setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    individual_detail: Option<IndividualDetail>,
    /// Replacement business details
    #[builder(setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    business_detail: Option<BusinessDetail>,
    /// Replacement metadata
    #[builder(setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Metadata>,
}

impl Validate for UpdateCustomerRequest {
    fn validate(&self) -> PaylineResult<()> {
        let mut v = Violations::new();
        let touches_something = self.email.is_some()
            || self.mobile_number.is_some()
            || self.description.is_some()
            || self.individual_detail.is_some()
            || self.business_detail.is_some()
            || self.metadata.is_some();
        v.check(touches_something, "update", "must set at least one field")
            .check(
                !(self.individual_detail.is_some() && self.business_detail.is_some()),
                "individual_detail",
                "cannot be combined with business_detail",
            )
            .email("email", self.email.as_deref())
            .phone("mobile_number", self.mobile_number.as_deref());
        if let Some(detail) = &self.individual_detail {
            v.non_empty("individual_detail.given_names", &detail.given_names);
        }
        if let Some(detail) = &self.business_detail {
            v.non_empty("business_detail.business_name", &detail.business_name);
        }
        v.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_profile_round_trips_tag() {
        let json = r#"{
            "id": "cust_1",
            "reference_id": "ref-1",
            "type": "BUSINESS",
            "business_detail": {"business_name": "Acme"},
            "email": "ops@acme.test"
        }"#;
        let customer: Customer = serde_json::from_str(json).unwrap();
        assert!(matches!(customer.profile(), CustomerProfile::Business { .. }));
        assert_eq!(customer.id(), "cust_1");

        let value = serde_json::to_value(&customer).unwrap();
        assert_eq!(value["type"], "BUSINESS");
        assert_eq!(value["business_detail"]["business_name"], "Acme");
    }
}
