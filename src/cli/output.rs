//! CLI output formatting utilities

use anyhow::Result;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use dialoguer::{theme::ColorfulTheme, Confirm};
use serde::Serialize;

use super::OutputFormat;
use crate::auth::Session;
use crate::models::{Client, Invoice, InvoiceStatus, Product};

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Format an invoice status as a colored string
pub fn format_status(status: InvoiceStatus) -> String {
    match status {
        InvoiceStatus::Paid => status.as_str().green().to_string(),
        InvoiceStatus::Overdue => status.as_str().red().to_string(),
        InvoiceStatus::Pending => status.as_str().yellow().to_string(),
    }
}

fn status_color(status: InvoiceStatus) -> Color {
    match status {
        InvoiceStatus::Paid => Color::Green,
        InvoiceStatus::Overdue => Color::Red,
        InvoiceStatus::Pending => Color::Yellow,
    }
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );
    table
}

/// Print records as a table, or serialized in the requested format
pub fn print_records<T: Serialize>(
    records: &[T],
    format: OutputFormat,
    table: impl FnOnce(&[T]),
) -> Result<()> {
    match format {
        OutputFormat::Table => table(records),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(records)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(records)?),
    }
    Ok(())
}

pub fn print_client_table(clients: &[Client]) {
    if clients.is_empty() {
        info("No clients found");
        return;
    }

    let mut table = new_table(&["ID", "Name", "Email", "Phone", "Payment"]);
    for client in clients {
        table.add_row(vec![
            Cell::new(client.id),
            Cell::new(&client.name),
            Cell::new(&client.email),
            Cell::new(client.phone_number.as_deref().unwrap_or("-")),
            Cell::new(
                client
                    .payment_preferences
                    .map(|p| p.label())
                    .unwrap_or("-"),
            ),
        ]);
    }
    println!("{table}");
}

pub fn print_product_table(products: &[Product]) {
    if products.is_empty() {
        info("No products found");
        return;
    }

    let mut table = new_table(&["ID", "Name", "Price", "Description", "Deleted"]);
    for product in products {
        let deleted = if product.deleted {
            Cell::new("yes").fg(Color::Red)
        } else {
            Cell::new("no")
        };
        table.add_row(vec![
            Cell::new(product.id),
            Cell::new(&product.name),
            Cell::new(product.price),
            Cell::new(product.description.as_deref().unwrap_or("-")),
            deleted,
        ]);
    }
    println!("{table}");
}

pub fn print_invoice_table(invoices: &[Invoice]) {
    if invoices.is_empty() {
        info("No invoices found");
        return;
    }

    let mut table = new_table(&["ID", "Number", "Client", "Issued", "Due", "Status", "Total"]);
    for invoice in invoices {
        table.add_row(vec![
            Cell::new(invoice.id),
            Cell::new(&invoice.invoice_number),
            Cell::new(invoice.client_name.as_deref().unwrap_or("-")),
            Cell::new(invoice.issue_date),
            Cell::new(invoice.due_date),
            Cell::new(invoice.status).fg(status_color(invoice.status)),
            Cell::new(invoice.total_amount),
        ]);
    }
    println!("{table}");
}

/// Print one invoice with its line items
pub fn print_invoice_detail(invoice: &Invoice) {
    println!("{}", "Invoice Details".bold().underline());
    println!();
    println!("  {} {}", "Number:".bold(), invoice.invoice_number);
    println!("  {} {}", "Status:".bold(), format_status(invoice.status));
    println!("  {} {}", "Issued:".bold(), invoice.issue_date);
    println!("  {} {}", "Due:".bold(), invoice.due_date);
    if let Some(terms) = invoice.payment_terms {
        println!("  {} {:?}", "Terms:".bold(), terms);
    }
    if let Some(name) = &invoice.client_name {
        println!("  {} {}", "Client:".bold(), name);
    }
    if let Some(email) = &invoice.client_email {
        println!("  {} {}", "Email:".bold(), email.cyan());
    }
    if let Some(address) = &invoice.client_address {
        println!("  {} {}", "Address:".bold(), address);
    }

    println!();
    let mut table = new_table(&["Product", "Qty", "Unit price", "Subtotal"]);
    for item in &invoice.items {
        table.add_row(vec![
            Cell::new(item.product_name.as_deref().unwrap_or("-")),
            Cell::new(item.quantity),
            Cell::new(item.unit_price),
            Cell::new(item.subtotal()),
        ]);
    }
    println!("{table}");
    println!("  {} {}", "Total:".bold(), invoice.total_amount);

    if !invoice.is_consistent() {
        warn(&format!(
            "Items add up to {}, not the invoiced total",
            invoice.items_total()
        ));
    }
}

pub fn print_session(session: &Session) {
    println!("  {} {}", "User:".bold(), session.user_id);
    println!("  {} {}", "Role:".bold(), session.role);

    let expires = chrono::DateTime::from_timestamp_millis(session.access_token_expires_at_epoch_millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string());
    let expires = if session.is_expired() {
        format!("{} (expired)", expires).yellow().to_string()
    } else {
        expires
    };
    println!("  {} {}", "Access token expires:".bold(), expires);
}

/// Confirm an action with the user
pub fn confirm(message: &str) -> bool {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(message)
        .default(false)
        .interact()
        .unwrap_or(false)
}
