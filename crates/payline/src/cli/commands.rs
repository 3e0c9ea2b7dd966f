//! CLI command definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};
use payline_core::InvoiceStatus;
use std::path::PathBuf;

/// Payline - typed, rate-limited access to the Payline payments API
#[derive(Parser, Debug)]
#[command(name = "payline")]
#[command(about = "Typed, rate-limited access to the Payline payments API", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file to use instead of the layered defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Customer commands
    #[command(subcommand)]
    Customers(CustomerCommands),

    /// Invoice commands
    #[command(subcommand)]
    Invoices(InvoiceCommands),

    /// Payment method commands
    #[command(subcommand)]
    PaymentMethods(PaymentMethodCommands),

    /// Webhook verification helpers
    #[command(subcommand)]
    Webhook(WebhookCommands),
}

/// Pagination flags shared by every `list` command
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Page size (1-100)
    #[arg(long, default_value_t = 10)]
    pub limit: u32,

    /// Walk pages until this many items were collected
    #[arg(long)]
    pub max_items: Option<usize>,

    /// Walk every page instead of stopping after the first
    #[arg(long)]
    pub all: bool,

    /// Resume after this id
    #[arg(long)]
    pub after_id: Option<String>,

    /// Output format
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,
}

impl ListArgs {
    /// Whether more than one page may be fetched.
    pub fn walks_pages(&self) -> bool {
        self.all || self.max_items.is_some()
    }
}

/// Customer subcommands
#[derive(Subcommand, Debug)]
pub enum CustomerCommands {
    /// List customers
    List {
        /// Only customers with this merchant reference
        #[arg(long)]
        reference_id: Option<String>,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Show one customer
    Get {
        /// Customer id
        id: String,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },
}

/// Invoice subcommands
#[derive(Subcommand, Debug)]
pub enum InvoiceCommands {
    /// List invoices
    List {
        /// Only invoices in these states, comma separated (e.g. PENDING,PAID)
        #[arg(long, value_delimiter = ',')]
        status: Vec<InvoiceStatus>,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Show one invoice
    Get {
        /// Invoice id
        id: String,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },
}

/// Payment method subcommands
#[derive(Subcommand, Debug)]
pub enum PaymentMethodCommands {
    /// List payment methods
    List {
        /// Only payment methods owned by this customer
        #[arg(long)]
        customer_id: Option<String>,

        #[command(flatten)]
        list: ListArgs,
    },
}

/// Webhook subcommands
#[derive(Subcommand, Debug)]
pub enum WebhookCommands {
    /// Check a received callback token
    VerifyToken {
        /// Token configured for the account
        #[arg(long, env = "PAYLINE_WEBHOOK_TOKEN", hide_env_values = true)]
        expected: String,

        /// Token the request carried
        #[arg(long)]
        received: String,
    },

    /// Check a `sha256=<hex>` body signature
    VerifySignature {
        /// Signing secret
        #[arg(long, env = "PAYLINE_WEBHOOK_SECRET", hide_env_values = true)]
        secret: String,

        /// Signature header value
        #[arg(long)]
        signature: String,

        /// File holding the raw request body, `-` for stdin
        #[arg(long)]
        body: PathBuf,
    },
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}
