//! Resource command handlers.

use super::commands::{
    CustomerCommands, InvoiceCommands, ListArgs, OutputFormat, PaymentMethodCommands,
};
use payline_client::{Invoices, PaylineClient};
use payline_core::{CursorOptions, Customer, Identifiable, Invoice, PaymentMethod};
use payline_error::{JsonError, PaylineError, PaylineResult};
use payline_pagination::FetchAllOptions;
use serde::Serialize;

/// Handle customer commands.
pub async fn handle_customer_command(
    client: &PaylineClient,
    cmd: CustomerCommands,
) -> PaylineResult<()> {
    let customers = client.customers();
    match cmd {
        CustomerCommands::List { reference_id, list } => {
            let mut cursor = cursor_options(&list);
            if let Some(reference_id) = reference_id {
                cursor = cursor.with_param("reference_id", reference_id);
            }
            let items = if list.walks_pages() {
                customers.list_all(&fetch_all_options(cursor, &list)).await?
            } else {
                customers.list(&cursor).await?.into_data()
            };
            print_list(&items, list.format, customer_line)
        }
        CustomerCommands::Get { id, format } => {
            let customer = customers.get(&id).await?;
            print_one(&customer, format, customer_line)
        }
    }
}

/// Handle invoice commands.
pub async fn handle_invoice_command(client: &PaylineClient, cmd: InvoiceCommands) -> PaylineResult<()> {
    let invoices = client.invoices();
    match cmd {
        InvoiceCommands::List { status, list } => {
            let cursor = Invoices::with_statuses(&cursor_options(&list), &status);
            let items = if list.walks_pages() {
                invoices.list_all(&fetch_all_options(cursor, &list)).await?
            } else {
                invoices.list(&cursor).await?.into_data()
            };
            print_list(&items, list.format, invoice_line)
        }
        InvoiceCommands::Get { id, format } => {
            let invoice = invoices.get(&id).await?;
            print_one(&invoice, format, invoice_line)
        }
    }
}

/// Handle payment method commands.
pub async fn handle_payment_method_command(
    client: &PaylineClient,
    cmd: PaymentMethodCommands,
) -> PaylineResult<()> {
    let payment_methods = client.payment_methods();
    match cmd {
        PaymentMethodCommands::List { customer_id, list } => {
            let mut cursor = cursor_options(&list);
            if let Some(customer_id) = customer_id {
                cursor = cursor.with_param("customer_id", customer_id);
            }
            let items = if list.walks_pages() {
                payment_methods
                    .list_all(&fetch_all_options(cursor, &list))
                    .await?
            } else {
                payment_methods.list(&cursor).await?.into_data()
            };
            print_list(&items, list.format, payment_method_line)
        }
    }
}

/// Cursor options described by the shared list flags.
pub fn cursor_options(list: &ListArgs) -> CursorOptions {
    let cursor = CursorOptions::new().with_limit(list.limit);
    match &list.after_id {
        Some(after_id) => cursor.with_after_id(after_id.clone()),
        None => cursor,
    }
}

/// Bounds for walking several pages.
pub fn fetch_all_options(cursor: CursorOptions, list: &ListArgs) -> FetchAllOptions {
    let options = FetchAllOptions::new(cursor);
    match list.max_items {
        Some(max_items) => options.with_max_items(max_items),
        None => options,
    }
}

fn customer_line(customer: &Customer) -> String {
    format!(
        "{}\t{}\t{}",
        Identifiable::id(customer),
        customer.reference_id(),
        customer.email().as_deref().unwrap_or("-")
    )
}

fn invoice_line(invoice: &Invoice) -> String {
    format!(
        "{}\t{}\t{}\t{:.2} {}",
        Identifiable::id(invoice),
        invoice.external_id(),
        invoice.status(),
        invoice.amount(),
        invoice.currency().as_deref().unwrap_or("")
    )
}

fn payment_method_line(payment_method: &PaymentMethod) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        Identifiable::id(payment_method),
        payment_method.status(),
        payment_method.reusability(),
        payment_method.customer_id().as_deref().unwrap_or("-")
    )
}

fn print_list<T: Serialize>(
    items: &[T],
    format: OutputFormat,
    line: fn(&T) -> String,
) -> PaylineResult<()> {
    match format {
        OutputFormat::Json => println!("{}", to_json(&items)?),
        OutputFormat::Human => {
            for item in items {
                println!("{}", line(item));
            }
            println!("Total: {} items", items.len());
        }
    }
    Ok(())
}

fn print_one<T: Serialize>(item: &T, format: OutputFormat, line: fn(&T) -> String) -> PaylineResult<()> {
    match format {
        OutputFormat::Json => println!("{}", to_json(item)?),
        OutputFormat::Human => println!("{}", line(item)),
    }
    Ok(())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> PaylineResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| PaylineError::from(JsonError::from_serde(&e, "CLI output")))
}
