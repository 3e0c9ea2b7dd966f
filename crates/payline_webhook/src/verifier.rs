//! Request-level webhook verification.

use crate::{WebhookEvent, verify_callback_token, verify_signature};
use payline_error::{PaylineResult, WebhookError, WebhookErrorKind};
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

/// Header carrying the account's callback token.
pub const CALLBACK_TOKEN_HEADER: &str = "x-callback-token";

/// Header carrying the `sha256=<hex>` body signature.
pub const SIGNATURE_HEADER: &str = "x-signature";

/// Verifies incoming webhook requests and decodes their event.
///
/// Every configured credential must check out: with a callback token set the
/// token header is required, with a signing secret set the signature header
/// is required.
///
/// # Examples
///
/// ```
/// use payline_webhook::{WebhookVerifier, compute_signature};
/// use std::collections::HashMap;
///
/// let body = br#"{"event":"invoice.paid","data":{"id":"inv_1"}}"#;
/// let verifier = WebhookVerifier::new()
///     .with_callback_token("tok_live")
///     .with_signing_secret("whsec_live");
///
/// let headers = HashMap::from([
///     ("X-Callback-Token".to_string(), "tok_live".to_string()),
///     ("X-Signature".to_string(), compute_signature("whsec_live", body).unwrap()),
/// ]);
/// let event = verifier.verify(&headers, body).unwrap();
/// assert!(event.is("invoice.paid"));
/// ```
#[derive(Clone, Default)]
pub struct WebhookVerifier {
    callback_token: Option<String>,
    signing_secret: Option<String>,
}

impl WebhookVerifier {
    /// A verifier with no credentials configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require the callback token header to equal `token`.
    pub fn with_callback_token(mut self, token: impl Into<String>) -> Self {
        self.callback_token = Some(token.into());
        self
    }

    /// Require a valid body signature under `secret`.
    pub fn with_signing_secret(mut self, secret: impl Into<String>) -> Self {
        self.signing_secret = Some(secret.into());
        self
    }

    /// Check the request and decode its event.
    ///
    /// Header names are matched case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns a webhook error when no credential is configured, a required
    /// header is missing, a check fails, or the body is not an event.
    #[instrument(skip_all, fields(bytes = body.len()))]
    pub fn verify(&self, headers: &HashMap<String, String>, body: &[u8]) -> PaylineResult<WebhookEvent> {
        if self.callback_token.is_none() && self.signing_secret.is_none() {
            return Err(WebhookError::new(WebhookErrorKind::InvalidSecret).into());
        }

        if let Some(expected) = &self.callback_token {
            let received = header(headers, CALLBACK_TOKEN_HEADER)?;
            verify_callback_token(expected, received).inspect_err(|_| {
                warn!("Webhook callback token rejected");
            })?;
        }
        if let Some(secret) = &self.signing_secret {
            let signature = header(headers, SIGNATURE_HEADER)?;
            verify_signature(secret, body, signature).inspect_err(|e| {
                warn!(error = %e, "Webhook signature rejected");
            })?;
        }

        let event = WebhookEvent::parse(body)?;
        debug!(event = %event.event, id = ?event.id, "Verified webhook");
        Ok(event)
    }
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("callback_token", &self.callback_token.as_ref().map(|_| "<redacted>"))
            .field("signing_secret", &self.signing_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn header<'a>(headers: &'a HashMap<String, String>, name: &str) -> PaylineResult<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
        .ok_or_else(|| WebhookError::new(WebhookErrorKind::MissingHeader(name.to_string())).into())
}
