//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub routes: RouteRules,

    #[serde(default)]
    pub cli: CliConfig,
}

/// HTTP listener for the front end
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Remote invoicing API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout; unset keeps the transport default
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:8080/api/v1".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

/// Browser session cookie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    #[serde(default)]
    pub secure_cookie: bool,

    /// Sessions untouched for this long are evicted
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
}

fn default_cookie_name() -> String {
    "invoice_session".to_string()
}

fn default_idle_timeout_secs() -> u64 {
    8 * 60 * 60
}

impl SessionConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            secure_cookie: false,
            idle_timeout_secs: default_idle_timeout_secs(),
        }
    }
}

/// Which paths the route guard lets through, and for whom
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRules {
    /// Exact paths that never require a session
    #[serde(default = "default_public_paths")]
    pub public_paths: Vec<String>,

    /// Path prefixes that require a valid session
    #[serde(default = "default_protected_prefixes")]
    pub protected_prefixes: Vec<String>,

    /// Path prefixes that additionally require the ADMIN role
    #[serde(default = "default_admin_prefixes")]
    pub admin_prefixes: Vec<String>,
}

fn default_public_paths() -> Vec<String> {
    ["/", "/login", "/register", "/verify", "/api/health"]
        .iter()
        .map(|p| p.to_string())
        .collect()
}

fn default_protected_prefixes() -> Vec<String> {
    ["/dashboard", "/clients", "/products", "/invoices", "/profile"]
        .iter()
        .map(|p| p.to_string())
        .collect()
}

fn default_admin_prefixes() -> Vec<String> {
    vec!["/dashboard/admin".to_string()]
}

impl Default for RouteRules {
    fn default() -> Self {
        Self {
            public_paths: default_public_paths(),
            protected_prefixes: default_protected_prefixes(),
            admin_prefixes: default_admin_prefixes(),
        }
    }
}

/// Command-line client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Where `invoice-admin login` keeps the token pair between runs
    #[serde(default = "default_session_file")]
    pub session_file: PathBuf,
}

fn default_session_file() -> PathBuf {
    PathBuf::from(".invoice-admin-session.json")
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            session_file: default_session_file(),
        }
    }
}
