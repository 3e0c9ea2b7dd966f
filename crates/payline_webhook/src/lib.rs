//! Webhook verification for the Payline payments API.
//!
//! Two independent checks are offered, both constant-time:
//! - a static callback token sent in [`CALLBACK_TOKEN_HEADER`]
//! - an HMAC-SHA256 body signature sent in [`SIGNATURE_HEADER`] as `sha256=<hex>`
//!
//! [`WebhookVerifier`] runs whichever checks are configured and decodes the
//! [`WebhookEvent`] envelope.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod event;
mod signature;
mod verifier;

pub use event::WebhookEvent;
pub use signature::{SIGNATURE_PREFIX, compute_signature, verify_callback_token, verify_signature};
pub use verifier::{CALLBACK_TOKEN_HEADER, SIGNATURE_HEADER, WebhookVerifier};
