//! Service-level API routes

use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;

use super::server::SharedState;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: &'static str,
    pub sessions: usize,
    pub api_base_url: String,
}

// Health check

pub async fn health(State(state): State<SharedState>) -> impl IntoResponse {
    Json(ApiResponse::ok(HealthStatus {
        status: "healthy",
        sessions: state.sessions.count().await,
        api_base_url: state.api.base_url().to_string(),
    }))
}

/// Fallback for paths no screen serves
pub async fn not_found() -> impl IntoResponse {
    (
        axum::http::StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::err("Not found")),
    )
}
