//! Validation rules for request payloads.

use payline_core::{
    ChargeSource, CreateCustomerRequestBuilder, CreateEwalletChargeRequestBuilder,
    CreateInvoiceRequestBuilder, CreateSessionRequestBuilder, CustomerProfile, IndividualDetail,
    InvoiceItem, PaymentMethodStatus, SessionMode, SessionType, UpdateCustomerRequest,
    UpdateCustomerRequestBuilder, UpdatePaymentMethodRequestBuilder, Validate,
};
use std::collections::BTreeMap;

fn individual(given_names: &str) -> CustomerProfile {
    CustomerProfile::Individual {
        individual_detail: IndividualDetail {
            given_names: given_names.to_string(),
            surname: None,
            nationality: None,
            date_of_birth: None,
        },
    }
}

#[test]
fn test_customer_with_blank_reference_is_rejected() -> anyhow::Result<()> {
    let request = CreateCustomerRequestBuilder::default()
        .reference_id("")
        .profile(individual("Ada"))
        .build()?;

    let err = request.validate().unwrap_err();
    let validation = err.as_validation().expect("validation error");
    assert_eq!(validation.field(), "reference_id");
    Ok(())
}

#[test]
fn test_customer_collects_every_violation() -> anyhow::Result<()> {
    let request = CreateCustomerRequestBuilder::default()
        .reference_id("cust-1")
        .profile(individual(""))
        .email("not-an-email")
        .mobile_number("12345")
        .build()?;

    let err = request.validate().unwrap_err();
    let validation = err.as_validation().expect("validation error");
    assert_eq!(validation.field(), "email");
    assert_eq!(validation.violations().len(), 3);
    Ok(())
}

#[test]
fn test_empty_customer_update_is_rejected() {
    let err = UpdateCustomerRequest::default().validate().unwrap_err();
    assert_eq!(err.as_validation().unwrap().field(), "update");
}

#[test]
fn test_customer_update_with_email_passes() -> anyhow::Result<()> {
    let request = UpdateCustomerRequestBuilder::default()
        .email("new@example.com")
        .build()?;
    assert!(request.validate().is_ok());
    Ok(())
}

#[test]
fn test_invoice_item_errors_point_at_items() -> anyhow::Result<()> {
    let request = CreateInvoiceRequestBuilder::default()
        .external_id("order-1")
        .amount(100.0)
        .items(vec![InvoiceItem {
            name: "Widget".to_string(),
            quantity: 0,
            price: 100.0,
            category: None,
        }])
        .build()?;

    let err = request.validate().unwrap_err();
    let validation = err.as_validation().unwrap();
    assert_eq!(validation.field(), "items");
    assert_eq!(validation.violations()[0].path, "items[0].quantity");
    Ok(())
}

#[test]
fn test_invoice_currency_must_be_uppercase() -> anyhow::Result<()> {
    let request = CreateInvoiceRequestBuilder::default()
        .external_id("order-2")
        .amount(10.0)
        .currency("usd")
        .build()?;
    let err = request.validate().unwrap_err();
    assert_eq!(err.as_validation().unwrap().field(), "currency");
    Ok(())
}

#[test]
fn test_payment_method_status_update_is_limited() -> anyhow::Result<()> {
    let request = UpdatePaymentMethodRequestBuilder::default()
        .status(PaymentMethodStatus::Expired)
        .build()?;
    let err = request.validate().unwrap_err();
    assert_eq!(err.as_validation().unwrap().field(), "status");

    let request = UpdatePaymentMethodRequestBuilder::default()
        .status(PaymentMethodStatus::Inactive)
        .build()?;
    assert!(request.validate().is_ok());
    Ok(())
}

#[test]
fn test_one_time_charge_needs_channel() -> anyhow::Result<()> {
    let request = CreateEwalletChargeRequestBuilder::default()
        .reference_id("charge-1")
        .currency("IDR")
        .amount(10_000.0)
        .source(ChargeSource::OneTimePayment {
            channel_code: " ".to_string(),
            channel_properties: BTreeMap::new(),
        })
        .build()?;
    let err = request.validate().unwrap_err();
    assert_eq!(err.as_validation().unwrap().field(), "channel_code");
    Ok(())
}

#[test]
fn test_pay_session_requires_amount() -> anyhow::Result<()> {
    let request = CreateSessionRequestBuilder::default()
        .reference_id("sess-1")
        .session_type(SessionType::Pay)
        .mode(SessionMode::PaymentLink)
        .currency("IDR")
        .country("ID")
        .build()?;
    let err = request.validate().unwrap_err();
    assert_eq!(err.as_validation().unwrap().field(), "amount");
    Ok(())
}

#[test]
fn test_save_session_without_amount_passes() -> anyhow::Result<()> {
    let request = CreateSessionRequestBuilder::default()
        .reference_id("sess-2")
        .session_type(SessionType::Save)
        .mode(SessionMode::Components)
        .currency("PHP")
        .country("PH")
        .customer_id("cust_1")
        .build()?;
    assert!(request.validate().is_ok());
    Ok(())
}

#[test]
fn test_session_country_shape() -> anyhow::Result<()> {
    let request = CreateSessionRequestBuilder::default()
        .reference_id("sess-3")
        .session_type(SessionType::Pay)
        .mode(SessionMode::PaymentLink)
        .currency("IDR")
        .country("IDN")
        .amount(5_000.0)
        .build()?;
    let err = request.validate().unwrap_err();
    assert_eq!(err.as_validation().unwrap().field(), "country");
    Ok(())
}
