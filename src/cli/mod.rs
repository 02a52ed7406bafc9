//! CLI interface for the invoice admin

pub mod commands;
mod output;
pub mod session_file;

pub use output::*;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "invoice-admin")]
#[command(author = "Krakaw")]
#[command(version)]
#[command(about = "Admin front end for the invoicing service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new invoice-admin.toml configuration file
    Init,

    /// Start the admin front end server
    Serve {
        /// Host to bind to (defaults to [server].host)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (defaults to [server].port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Sign in to the invoicing API and keep the session locally
    Login {
        #[arg(short, long)]
        email: String,

        /// Password (prompted for when omitted)
        #[arg(long, env = "INVOICE_ADMIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the local session
    Logout,

    /// Show who the local session belongs to
    Whoami,

    /// Manage clients
    Clients {
        #[command(subcommand)]
        action: ClientsAction,
    },

    /// Browse products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },

    /// Manage invoices
    Invoices {
        #[command(subcommand)]
        action: InvoicesAction,
    },
}

#[derive(Subcommand)]
pub enum ClientsAction {
    /// List clients
    List {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Delete a client
    Delete {
        id: i64,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum ProductsAction {
    /// List products
    List {
        /// Free-text search on name and description
        #[arg(long)]
        search: Option<String>,

        #[arg(long)]
        min_price: Option<String>,

        #[arg(long)]
        max_price: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Subcommand)]
pub enum InvoicesAction {
    /// List invoices
    List {
        #[arg(long)]
        number: Option<String>,

        #[arg(long)]
        client: Option<String>,

        /// Issue date, YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,

        /// PENDING, PAID or OVERDUE
        #[arg(long)]
        status: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show one invoice with its items
    Show { id: i64 },

    /// Move an invoice to PAID or OVERDUE
    Mark { id: i64, status: String },

    /// Email an invoice to its client
    Send { id: i64 },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}
