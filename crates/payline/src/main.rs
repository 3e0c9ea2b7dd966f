//! Payline CLI binary.
//!
//! This binary provides command-line access to the Payline API:
//! - List and show customers, invoices and payment methods
//! - Verify webhook callback tokens and signatures

use clap::Parser;
use payline::cli::{
    Cli, Commands, handle_customer_command, handle_invoice_command,
    handle_payment_method_command, handle_webhook_command,
};
use payline::telemetry::init_tracing;
use payline::{PaylineClient, PaylineConfig, PaylineResult};
use std::path::Path;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    init_tracing(cli.verbose)?;

    // Execute the requested command
    match cli.command {
        Commands::Customers(cmd) => {
            let client = build_client(cli.config.as_deref())?;
            handle_customer_command(&client, cmd).await?;
        }

        Commands::Invoices(cmd) => {
            let client = build_client(cli.config.as_deref())?;
            handle_invoice_command(&client, cmd).await?;
        }

        Commands::PaymentMethods(cmd) => {
            let client = build_client(cli.config.as_deref())?;
            handle_payment_method_command(&client, cmd).await?;
        }

        Commands::Webhook(cmd) => {
            handle_webhook_command(cmd)?;
        }
    }

    Ok(())
}

fn build_client(config_path: Option<&Path>) -> PaylineResult<PaylineClient> {
    let config = match config_path {
        Some(path) => PaylineConfig::from_file(path)?,
        None => PaylineConfig::load()?,
    };
    PaylineClient::new(&config)
}
