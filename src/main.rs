use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use invoice_admin::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "invoice_admin=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => cli::commands::init().await,
        Commands::Serve { host, port } => cli::commands::serve(host, port).await,
        Commands::Login { email, password } => cli::commands::login(&email, password).await,
        Commands::Logout => cli::commands::logout().await,
        Commands::Whoami => cli::commands::whoami().await,
        Commands::Clients { action } => cli::commands::clients(action).await,
        Commands::Products { action } => cli::commands::products(action).await,
        Commands::Invoices { action } => cli::commands::invoices(action).await,
    }
}
