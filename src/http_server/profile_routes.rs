//! # Profile Routes
//!
//! Profile read/update and the session wishlist.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};

use super::errors::ApiError;
use super::AppState;
use crate::models::{BooleanMessage, ProfileForm, ProfileMiniForm, SessionForms};

/// Profile route table
pub fn profile_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/profile", get(get_profile_handler).post(save_profile_handler))
        .route("/profile/wishlist/all", get(wishlist_handler))
        .route(
            "/profile/wishlist/:websafe_session_key",
            post(wishlist_add_handler).delete(wishlist_remove_handler),
        )
        .with_state(state)
}

async fn get_profile_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ProfileForm>, ApiError> {
    let user = state.authenticate(&headers)?;
    let profile = state.profiles().get_or_create(&user)?;
    Ok(Json(profile.to_form()))
}

async fn save_profile_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(form): Json<ProfileMiniForm>,
) -> Result<Json<ProfileForm>, ApiError> {
    let user = state.authenticate(&headers)?;
    let profile = state.profiles().save(&user, &form)?;
    Ok(Json(profile.to_form()))
}

async fn wishlist_add_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(websafe_session_key): Path<String>,
) -> Result<Json<BooleanMessage>, ApiError> {
    let user = state.authenticate(&headers)?;
    let added = state.sessions().wishlist_add(&user, &websafe_session_key)?;
    Ok(Json(BooleanMessage::new(added)))
}

async fn wishlist_remove_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(websafe_session_key): Path<String>,
) -> Result<Json<BooleanMessage>, ApiError> {
    let user = state.authenticate(&headers)?;
    let removed = state
        .sessions()
        .wishlist_remove(&user, &websafe_session_key)?;
    Ok(Json(BooleanMessage::new(removed)))
}

async fn wishlist_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<SessionForms>, ApiError> {
    let user = state.authenticate(&headers)?;
    let items = state.sessions().wishlist(&user)?;
    Ok(Json(SessionForms { items }))
}
