//! # Operational Routes
//!
//! Health check and the manual cron trigger for the announcement refresh.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use super::errors::ApiError;
use super::AppState;
use crate::observability::Logger;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Health and cron route table
pub fn ops_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/crons/set_announcement", get(set_announcement_handler))
        .with_state(state)
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn set_announcement_handler(
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, ApiError> {
    let announcement = state.conferences().refresh_announcement()?;
    Logger::info("announcement_refreshed", &[("announcement", &announcement)]);
    Ok(StatusCode::NO_CONTENT)
}
