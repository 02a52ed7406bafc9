//! HTTP server: shared state, router assembly and startup

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::auth::{route_guard, Authenticator, SessionManager, TokenRefresher};
use crate::client::{ApiClient, Clients, Invoices, Products};
use crate::config::Config;
use crate::error::Result;
use crate::ui::{auth, crud, dashboard, invoices, profile};

use super::routes;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub api: ApiClient,
    pub authenticator: Authenticator,
    pub sessions: SessionManager,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let api = ApiClient::new(&config.api)?;
        let authenticator = Authenticator::new(api.clone());
        let sessions = SessionManager::new(
            TokenRefresher::new(api.clone()),
            config.session.idle_timeout(),
        );
        Ok(Self {
            config,
            api,
            authenticator,
            sessions,
        })
    }
}

pub type SharedState = Arc<AppState>;

/// Run the front end on `host:port`
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::new(config)?);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Remote API at {}", state.api.base_url());

    serve(listener, state).await
}

/// Serve on an already bound listener
pub async fn serve(listener: TcpListener, state: SharedState) -> Result<()> {
    let sweeper = tokio::spawn(sweep_sessions(state.sessions.clone()));
    let result = axum::serve(listener, create_router(state)).await;
    sweeper.abort();
    result?;
    Ok(())
}

/// Drop errored and idle sessions once a minute
async fn sweep_sessions(sessions: SessionManager) {
    let mut interval = tokio::time::interval(SWEEP_INTERVAL);
    loop {
        interval.tick().await;
        let removed = sessions.sweep().await;
        if removed > 0 {
            tracing::info!("Removed {} stale sessions", removed);
        }
    }
}

/// Create the router with all screens behind the route guard
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        // Service routes
        .route("/api/health", get(routes::health))
        // Public screens
        .route("/", get(auth::home))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/verify", get(auth::verify_page).post(auth::verify))
        // Dashboards
        .route("/dashboard", get(dashboard::dashboard))
        .route("/dashboard/admin", get(dashboard::admin_dashboard))
        // Clients
        .route("/clients", get(crud::list::<Clients>))
        .route("/clients/reset", get(crud::reset::<Clients>))
        .route(
            "/clients/form",
            get(crud::form_page::<Clients>).post(crud::submit::<Clients>),
        )
        .route("/clients/{id}/delete", post(crud::delete::<Clients>))
        // Products
        .route("/products", get(crud::list::<Products>))
        .route("/products/reset", get(crud::reset::<Products>))
        .route(
            "/products/form",
            get(crud::form_page::<Products>).post(crud::submit::<Products>),
        )
        .route("/products/{id}/delete", post(crud::delete::<Products>))
        // Invoices
        .route("/invoices", get(crud::list::<Invoices>))
        .route("/invoices/reset", get(crud::reset::<Invoices>))
        .route(
            "/invoices/form",
            get(invoices::form_page).post(invoices::submit),
        )
        .route("/invoices/form/preview", post(invoices::preview))
        .route("/invoices/{id}", get(invoices::detail))
        .route("/invoices/{id}/status/{status}", post(invoices::update_status))
        .route("/invoices/{id}/send-email", post(invoices::send_email))
        // Profile
        .route(
            "/profile",
            get(profile::profile_page).post(profile::update_profile),
        )
        .fallback(routes::not_found)
        // Middleware
        .layer(middleware::from_fn_with_state(state.clone(), route_guard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
