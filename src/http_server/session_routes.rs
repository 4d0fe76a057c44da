//! # Session Routes
//!
//! Session creation and lookups under a conference, speaker queries,
//! filtered search, and the featured-speaker endpoint.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};

use super::errors::ApiError;
use super::AppState;
use crate::models::{SessionForm, SessionForms, SessionQueryForms, StringMessage};
use crate::observability::Logger;

/// Session route table
pub fn session_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/conference/:websafe_key/sessions",
            get(conference_sessions_handler),
        )
        .route(
            "/conference/:websafe_key/sessions/type/:type_of_session",
            get(sessions_by_type_handler),
        )
        .route("/sessions/speaker/:speaker", get(sessions_by_speaker_handler))
        .route("/conference/sessions/:websafe_key", post(create_session_handler))
        .route("/querySessions", post(query_sessions_handler))
        .route("/sessions/featured/get", get(featured_speaker_handler))
        .with_state(state)
}

async fn create_session_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(websafe_key): Path<String>,
    Json(form): Json<SessionForm>,
) -> Result<Json<SessionForm>, ApiError> {
    let user = state.authenticate(&headers)?;
    let created = state.sessions().create(&user, &websafe_key, &form)?;
    Logger::info("session_created", &[("organizer", &user.user_id)]);
    Ok(Json(created))
}

async fn conference_sessions_handler(
    State(state): State<Arc<AppState>>,
    Path(websafe_key): Path<String>,
) -> Result<Json<SessionForms>, ApiError> {
    let items = state.sessions().by_conference(&websafe_key)?;
    Ok(Json(SessionForms { items }))
}

async fn sessions_by_type_handler(
    State(state): State<Arc<AppState>>,
    Path((websafe_key, type_of_session)): Path<(String, String)>,
) -> Result<Json<SessionForms>, ApiError> {
    let items = state.sessions().by_type(&websafe_key, &type_of_session)?;
    Ok(Json(SessionForms { items }))
}

async fn sessions_by_speaker_handler(
    State(state): State<Arc<AppState>>,
    Path(speaker): Path<String>,
) -> Result<Json<SessionForms>, ApiError> {
    let items = state.sessions().by_speaker(&speaker)?;
    Ok(Json(SessionForms { items }))
}

async fn query_sessions_handler(
    State(state): State<Arc<AppState>>,
    Json(form): Json<SessionQueryForms>,
) -> Result<Json<SessionForms>, ApiError> {
    let items = state.sessions().query(&form.filters)?;
    Ok(Json(SessionForms { items }))
}

async fn featured_speaker_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StringMessage>, ApiError> {
    Ok(Json(StringMessage::new(state.sessions().featured_speaker())))
}
