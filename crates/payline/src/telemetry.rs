//! Tracing setup for the payline binary.

use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is not set.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "info,payline=debug,payline_client=debug,payline_rate_limit=debug,payline_pagination=debug,payline_webhook=debug"
    } else {
        "warn,payline=info"
    }
}

/// Initialize console logging.
///
/// `RUST_LOG` wins over `verbose` when set. Logs go to stderr so JSON output
/// on stdout stays machine readable.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()?;

    debug!(verbose, "Tracing initialized");
    Ok(())
}
