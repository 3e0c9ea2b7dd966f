//! Core data types for the Payline payments API client.
//!
//! This crate provides the data model shared by every other Payline crate:
//! - Cursor pagination types ([`Page`], [`CursorOptions`], [`PageRequest`])
//! - Resource models for customers, invoices, payment methods,
//!   e-wallet charges and payment sessions
//! - Local request validation ([`Validate`])

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod customer;
mod ewallet;
mod invoice;
mod page;
mod payment_method;
mod session;
mod validate;

pub use customer::{
    BusinessDetail, CreateCustomerRequest, CreateCustomerRequestBuilder, Customer, CustomerProfile,
    IndividualDetail, UpdateCustomerRequest, UpdateCustomerRequestBuilder,
};
pub use ewallet::{
    ChargeActions, ChargeSource, ChargeStatus, CreateEwalletChargeRequest,
    CreateEwalletChargeRequestBuilder, EwalletCharge,
};
pub use invoice::{
    CreateInvoiceRequest, CreateInvoiceRequestBuilder, Invoice, InvoiceItem, InvoiceStatus,
};
pub use page::{
    CursorOptions, DEFAULT_PAGE_LIMIT, Identifiable, ListEnvelope, MAX_PAGE_LIMIT, Page,
    PageRequest,
};
pub use payment_method::{
    CardParams, ChannelParams, CreatePaymentMethodRequest, CreatePaymentMethodRequestBuilder,
    PaymentMethod, PaymentMethodDetails, PaymentMethodStatus, QrCodeParams, Reusability,
    UpdatePaymentMethodRequest, UpdatePaymentMethodRequestBuilder, VirtualAccountParams,
};
pub use session::{
    CreateSessionRequest, CreateSessionRequestBuilder, Session, SessionMode, SessionStatus,
    SessionType,
};
pub use validate::{Validate, Violations};

/// Free-form key/value metadata attached to resources.
pub type Metadata = std::collections::BTreeMap<String, serde_json::Value>;
