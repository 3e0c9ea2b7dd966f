//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the payline binary.

mod commands;
mod resources;
mod webhook;

pub use commands::{
    Cli, Commands, CustomerCommands, InvoiceCommands, ListArgs, OutputFormat,
    PaymentMethodCommands, WebhookCommands,
};
pub use resources::{
    cursor_options, fetch_all_options, handle_customer_command, handle_invoice_command,
    handle_payment_method_command,
};
pub use webhook::{handle_webhook_command, read_body};
