//! Locating, reading and checking `invoice-admin.toml`

use crate::error::{Error, Result};
use regex::{Captures, Regex};
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use super::Config;

pub const CONFIG_FILENAME: &str = "invoice-admin.toml";

/// `${NAME}` or `${NAME:-fallback}`
static ENV_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid env reference regex - this is a bug in the codebase")
});

/// Load the nearest invoice-admin.toml at or above the working directory
pub fn load_config() -> Result<Config> {
    let cwd = env::current_dir()?;
    let path = find_config_file(&cwd).ok_or(Error::ConfigNotFound)?;
    load_config_from_path(&path)
}

/// Load, interpolate and check one config file
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let raw = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::ConfigNotFound,
        _ => Error::Io(e),
    })?;
    let config: Config = toml::from_str(&interpolate_env_vars(&raw))?;
    check(&config)?;
    tracing::debug!(
        "Loaded configuration from {} (API at {})",
        path.display(),
        config.api.base_url
    );
    Ok(config)
}

fn find_config_file(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILENAME))
        .find(|candidate| candidate.is_file())
}

/// Replace env references; unset variables take the fallback, or nothing
fn interpolate_env_vars(raw: &str) -> String {
    ENV_REF
        .replace_all(raw, |caps: &Captures| {
            env::var(&caps[1])
                .unwrap_or_else(|_| caps.get(2).map_or("", |m| m.as_str()).to_string())
        })
        .into_owned()
}

/// Settings the front end cannot run with
fn check(config: &Config) -> Result<()> {
    let base_url = &config.api.base_url;
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(Error::Config(format!(
            "api.base_url must be an http(s) URL, got '{}'",
            base_url
        )));
    }
    if config.session.cookie_name.is_empty() {
        return Err(Error::Config("session.cookie_name must not be empty".to_string()));
    }
    Ok(())
}

/// Generate a default configuration file content
pub fn default_config_content() -> &'static str {
    r#"# Invoice admin front end configuration

[server]
host = "0.0.0.0"
port = 3000

[api]
# Base URL of the invoicing REST API
base_url = "${INVOICE_API_BASE_URL:-http://localhost:8080/api/v1}"
# timeout_secs = 30

[session]
cookie_name = "invoice_session"
secure_cookie = false
# Evict sessions idle for longer than this
idle_timeout_secs = 28800

[routes]
public_paths = ["/", "/login", "/register", "/verify", "/api/health"]
protected_prefixes = ["/dashboard", "/clients", "/products", "/invoices", "/profile"]
admin_prefixes = ["/dashboard/admin"]

[cli]
session_file = ".invoice-admin-session.json"
"#
}
