//! # Conference Routes
//!
//! Conference CRUD, filtered search, registration, and the announcement
//! endpoint. Paths mirror the RPC-style API surface.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};

use super::errors::ApiError;
use super::AppState;
use crate::models::{
    BooleanMessage, ConferenceForm, ConferenceForms, ConferenceQueryForms, StringMessage,
};
use crate::observability::Logger;

/// Conference route table
pub fn conference_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/conference", post(create_conference_handler))
        .route(
            "/conference/:websafe_key",
            get(get_conference_handler)
                .put(update_conference_handler)
                .post(register_handler)
                .delete(unregister_handler),
        )
        .route("/getConferencesCreated", post(conferences_created_handler))
        .route("/queryConferences", post(query_conferences_handler))
        .route("/conferences/attending", get(conferences_attending_handler))
        .route("/conference/announcement/get", get(announcement_handler))
        .with_state(state)
}

async fn create_conference_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(form): Json<ConferenceForm>,
) -> Result<Json<ConferenceForm>, ApiError> {
    let user = state.authenticate(&headers)?;
    let created = state.conferences().create(&user, &form)?;
    Logger::info("conference_created", &[("organizer", &user.user_id)]);
    Ok(Json(created))
}

async fn get_conference_handler(
    State(state): State<Arc<AppState>>,
    Path(websafe_key): Path<String>,
) -> Result<Json<ConferenceForm>, ApiError> {
    Ok(Json(state.conferences().get(&websafe_key)?))
}

async fn update_conference_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(websafe_key): Path<String>,
    Json(form): Json<ConferenceForm>,
) -> Result<Json<ConferenceForm>, ApiError> {
    let user = state.authenticate(&headers)?;
    Ok(Json(state.conferences().update(&user, &websafe_key, &form)?))
}

async fn register_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(websafe_key): Path<String>,
) -> Result<Json<BooleanMessage>, ApiError> {
    let user = state.authenticate(&headers)?;
    let registered = state.conferences().register(&user, &websafe_key)?;
    Ok(Json(BooleanMessage::new(registered)))
}

async fn unregister_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(websafe_key): Path<String>,
) -> Result<Json<BooleanMessage>, ApiError> {
    let user = state.authenticate(&headers)?;
    let unregistered = state.conferences().unregister(&user, &websafe_key)?;
    Ok(Json(BooleanMessage::new(unregistered)))
}

async fn conferences_created_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ConferenceForms>, ApiError> {
    let user = state.authenticate(&headers)?;
    let items = state.conferences().created_by(&user)?;
    Ok(Json(ConferenceForms { items }))
}

async fn query_conferences_handler(
    State(state): State<Arc<AppState>>,
    Json(form): Json<ConferenceQueryForms>,
) -> Result<Json<ConferenceForms>, ApiError> {
    let items = state.conferences().query(&form.filters)?;
    Ok(Json(ConferenceForms { items }))
}

async fn conferences_attending_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ConferenceForms>, ApiError> {
    let user = state.authenticate(&headers)?;
    let items = state.conferences().attending(&user)?;
    Ok(Json(ConferenceForms { items }))
}

async fn announcement_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StringMessage>, ApiError> {
    Ok(Json(StringMessage::new(state.conferences().announcement())))
}
