//! Webhook token and signature checks.

use hmac::{Hmac, Mac};
use payline_error::{PaylineResult, WebhookError, WebhookErrorKind};
use sha2::Sha256;
use subtle::ConstantTimeEq;

/// Prefix of the signature header value.
pub const SIGNATURE_PREFIX: &str = "sha256=";

/// Compare the configured callback token with the one a request carried.
///
/// The comparison is constant-time in the token contents.
///
/// # Errors
///
/// Returns [`WebhookErrorKind::TokenMismatch`] when the tokens differ.
///
/// # Examples
///
/// ```
/// use payline_webhook::verify_callback_token;
///
/// assert!(verify_callback_token("tok_live_1", "tok_live_1").is_ok());
/// assert!(verify_callback_token("tok_live_1", "tok_live_2").is_err());
/// ```
pub fn verify_callback_token(expected: &str, received: &str) -> PaylineResult<()> {
    if expected.is_empty() {
        return Err(WebhookError::new(WebhookErrorKind::InvalidSecret).into());
    }
    if bool::from(expected.as_bytes().ct_eq(received.as_bytes())) {
        Ok(())
    } else {
        Err(WebhookError::new(WebhookErrorKind::TokenMismatch).into())
    }
}

/// Hex HMAC-SHA256 of `body` keyed by `secret`, in header form.
///
/// # Errors
///
/// Returns [`WebhookErrorKind::InvalidSecret`] for an empty secret.
///
/// # Examples
///
/// ```
/// use payline_webhook::compute_signature;
///
/// let signature = compute_signature("whsec", b"{}").unwrap();
/// assert!(signature.starts_with("sha256="));
/// assert_eq!(signature.len(), "sha256=".len() + 64);
/// ```
pub fn compute_signature(secret: &str, body: &[u8]) -> PaylineResult<String> {
    let digest = digest(secret, body)?;
    Ok(format!("{}{}", SIGNATURE_PREFIX, hex::encode(digest)))
}

/// Check a `sha256=<hex>` signature header against `body`.
///
/// The header may be upper- or lower-case hex. Digests are compared in
/// constant time.
///
/// # Errors
///
/// - [`WebhookErrorKind::MalformedSignature`] when the header is not in
///   `sha256=<64 hex digits>` form
/// - [`WebhookErrorKind::SignatureMismatch`] when the digest differs
/// - [`WebhookErrorKind::InvalidSecret`] for an empty secret
pub fn verify_signature(secret: &str, body: &[u8], signature: &str) -> PaylineResult<()> {
    let provided = parse_signature(signature)?;
    let expected = digest(secret, body)?;
    if bool::from(expected.as_slice().ct_eq(provided.as_slice())) {
        Ok(())
    } else {
        Err(WebhookError::new(WebhookErrorKind::SignatureMismatch).into())
    }
}

fn parse_signature(signature: &str) -> PaylineResult<Vec<u8>> {
    let hex_digest = signature
        .trim()
        .strip_prefix(SIGNATURE_PREFIX)
        .ok_or_else(|| {
            WebhookError::new(WebhookErrorKind::MalformedSignature(format!(
                "expected '{}' prefix",
                SIGNATURE_PREFIX
            )))
        })?;
    if hex_digest.len() != 64 {
        return Err(WebhookError::new(WebhookErrorKind::MalformedSignature(format!(
            "expected 64 hex digits, got {}",
            hex_digest.len()
        )))
        .into());
    }
    hex::decode(hex_digest).map_err(|e| {
        WebhookError::new(WebhookErrorKind::MalformedSignature(e.to_string())).into()
    })
}

fn digest(secret: &str, body: &[u8]) -> PaylineResult<Vec<u8>> {
    if secret.is_empty() {
        return Err(WebhookError::new(WebhookErrorKind::InvalidSecret).into());
    }
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|_| WebhookError::new(WebhookErrorKind::InvalidSecret))?;
    mac.update(body);
    Ok(mac.finalize().into_bytes().to_vec())
}
