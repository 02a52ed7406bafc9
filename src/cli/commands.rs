//! CLI command implementations

use anyhow::{bail, Result};
use dialoguer::{theme::ColorfulTheme, Password};
use std::fs;
use std::path::Path;

use crate::auth::{Authenticator, Credentials, TokenRefresher};
use crate::cli::{
    confirm, error, info, print_client_table, print_invoice_detail, print_invoice_table,
    print_product_table, print_records, print_session, session_file, success, warn,
    ClientsAction, InvoicesAction, ProductsAction,
};
use crate::client::{ApiClient, Clients, Invoices, Products};
use crate::config::{self, loader::CONFIG_FILENAME, Config};
use crate::models::{ClientFilter, InvoiceFilter, InvoiceStatus, ProductFilter};

/// Initialize a new invoice-admin.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = Path::new(CONFIG_FILENAME);

    if config_path.exists() {
        warn(&format!("{} already exists", CONFIG_FILENAME));
        return Ok(());
    }

    fs::write(config_path, config::loader::default_config_content())?;

    success(&format!("Created {}", CONFIG_FILENAME));
    info("Set [api].base_url, then run 'invoice-admin login --email <email>' or 'invoice-admin serve'");

    Ok(())
}

/// Start the admin front end server
pub async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = load_config()?;
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    info(&format!("Starting server at http://{}:{}", host, port));

    crate::api::run_server(config, &host, port).await?;
    Ok(())
}

/// Sign in and store the session locally
pub async fn login(email: &str, password: Option<String>) -> Result<()> {
    let config = load_config()?;
    let api = ApiClient::new(&config.api)?;

    let password = match password {
        Some(password) => password,
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Password")
            .interact()?,
    };
    let credentials = Credentials {
        email: email.to_string(),
        password,
    };

    match Authenticator::new(api).login(&credentials).await {
        Ok(session) => {
            session_file::save(&config.cli.session_file, &session)?;
            success(&format!("Signed in as {} ({})", email, session.role));
            Ok(())
        }
        Err(e) => {
            error(&format!("Login failed: {}", e.user_message()));
            Err(e.into())
        }
    }
}

/// Forget the local session
pub async fn logout() -> Result<()> {
    let config = load_config()?;
    if session_file::remove(&config.cli.session_file)? {
        success("Signed out");
    } else {
        info("Not signed in");
    }
    Ok(())
}

/// Show the local session
pub async fn whoami() -> Result<()> {
    let config = load_config()?;
    match session_file::load(&config.cli.session_file)? {
        Some(session) if session.is_valid() => {
            print_session(&session);
            Ok(())
        }
        Some(_) => {
            warn("Session could not be refreshed. Run 'invoice-admin login' again");
            Ok(())
        }
        None => {
            info("Not signed in");
            Ok(())
        }
    }
}

/// Client commands
pub async fn clients(action: ClientsAction) -> Result<()> {
    let (api, token) = signed_in().await?;

    match action {
        ClientsAction::List {
            name,
            email,
            phone,
            format,
        } => {
            let filter = ClientFilter {
                name,
                email,
                phone_number: phone,
            };
            let clients = api.list::<Clients>(&token, &filter).await?;
            print_records(&clients, format, print_client_table)
        }
        ClientsAction::Delete { id, force } => {
            if !force && !confirm(&format!("Are you sure you want to delete client {}?", id)) {
                info("Cancelled");
                return Ok(());
            }
            match api.delete::<Clients>(&token, id).await {
                Ok(_) => {
                    success(&format!("Deleted client {}", id));
                    Ok(())
                }
                Err(e) => {
                    error(&format!("Failed to delete client: {}", e.user_message()));
                    Err(e.into())
                }
            }
        }
    }
}

/// Product commands
pub async fn products(action: ProductsAction) -> Result<()> {
    let (api, token) = signed_in().await?;

    match action {
        ProductsAction::List {
            search,
            min_price,
            max_price,
            format,
        } => {
            let filter = ProductFilter {
                search,
                min_price,
                max_price,
            };
            let products = api.list::<Products>(&token, &filter).await?;
            print_records(&products, format, print_product_table)
        }
    }
}

/// Invoice commands
pub async fn invoices(action: InvoicesAction) -> Result<()> {
    let (api, token) = signed_in().await?;

    match action {
        InvoicesAction::List {
            number,
            client,
            date,
            status,
            format,
        } => {
            let filter = InvoiceFilter {
                invoice_number: number,
                client_name: client,
                date,
                status,
            };
            let invoices = api.list::<Invoices>(&token, &filter).await?;
            print_records(&invoices, format, print_invoice_table)
        }
        InvoicesAction::Show { id } => {
            let invoice = api.fetch::<Invoices>(&token, id).await?;
            print_invoice_detail(&invoice);
            Ok(())
        }
        InvoicesAction::Mark { id, status } => {
            let status: InvoiceStatus = status.parse()?;
            match api.update_invoice_status(&token, id, status).await {
                Ok(_) => {
                    success(&format!("Invoice {} marked as {}", id, status));
                    Ok(())
                }
                Err(e) => {
                    error(&format!("Failed to update invoice: {}", e.user_message()));
                    Err(e.into())
                }
            }
        }
        InvoicesAction::Send { id } => {
            let message = api.send_invoice_email(&token, id).await?;
            success(message.as_deref().unwrap_or("Invoice sent to client's email"));
            Ok(())
        }
    }
}

/// API client plus a fresh access token from the stored session
///
/// An expired token is refreshed once and the result written back; a failed
/// refresh removes the stored session.
async fn signed_in() -> Result<(ApiClient, String)> {
    let config = load_config()?;
    let path = &config.cli.session_file;

    let Some(mut session) = session_file::load(path)? else {
        bail!("Not signed in. Run 'invoice-admin login --email <email>' first");
    };

    let api = ApiClient::new(&config.api)?;
    let was_expired = session.is_expired();
    let refresher = TokenRefresher::new(api.clone());

    if let Err(e) = refresher.ensure_fresh(&mut session).await {
        session_file::remove(path)?;
        bail!("Session expired ({}). Run 'invoice-admin login' again", e);
    }
    if was_expired {
        session_file::save(path, &session)?;
    }

    Ok((api, session.access_token))
}

fn load_config() -> Result<Config> {
    config::load_config().map_err(|e| anyhow::anyhow!("{}", e))
}
