//! Webhook command handlers.

use super::commands::WebhookCommands;
use payline_error::{ConfigError, PaylineError, PaylineResult};
use payline_webhook::{verify_callback_token, verify_signature};
use std::io::Read;
use std::path::Path;

/// Handle webhook verification commands.
///
/// Prints `valid` on success; failures surface as errors.
pub fn handle_webhook_command(cmd: WebhookCommands) -> PaylineResult<()> {
    match cmd {
        WebhookCommands::VerifyToken { expected, received } => {
            verify_callback_token(&expected, &received)?;
        }
        WebhookCommands::VerifySignature {
            secret,
            signature,
            body,
        } => {
            let body = read_body(&body)?;
            verify_signature(&secret, &body, &signature)?;
        }
    }
    println!("valid");
    Ok(())
}

/// Read a request body from a file, or stdin for `-`.
pub fn read_body(path: &Path) -> PaylineResult<Vec<u8>> {
    let result = if path == Path::new("-") {
        let mut body = Vec::new();
        std::io::stdin().read_to_end(&mut body).map(|_| body)
    } else {
        std::fs::read(path)
    };
    result.map_err(|e| {
        PaylineError::from(ConfigError::new(format!(
            "Failed to read webhook body from {}: {}",
            path.display(),
            e
        )))
    })
}
