//! # HTTP Server
//!
//! RPC-style endpoints over axum, split per concern. Handlers are thin:
//! resolve identity, delegate to an entity service, shape the response.

pub mod conference_routes;
pub mod config;
pub mod errors;
pub mod ops_routes;
pub mod profile_routes;
pub mod server;
pub mod session_routes;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ErrorResponse};
pub use server::HttpServer;

use std::sync::Arc;

use axum::http::{header, HeaderMap};

use crate::auth::{authenticate_header, AuthUser, TokenVerifier};
use crate::cache::MemoryCache;
use crate::datastore::Datastore;
use crate::services::{ConferenceService, ProfileService, SessionService};
use crate::tasks::TaskQueue;

/// Shared state handed to every route module
pub struct AppState {
    pub store: Arc<Datastore>,
    pub cache: Arc<MemoryCache>,
    pub queue: TaskQueue,
    pub verifier: TokenVerifier,
}

impl AppState {
    pub fn new(
        store: Arc<Datastore>,
        cache: Arc<MemoryCache>,
        queue: TaskQueue,
        verifier: TokenVerifier,
    ) -> Self {
        Self {
            store,
            cache,
            queue,
            verifier,
        }
    }

    /// Conference service bound to this state
    pub fn conferences(&self) -> ConferenceService {
        ConferenceService::new(self.store.clone(), self.cache.clone(), self.queue.clone())
    }

    /// Session service bound to this state
    pub fn sessions(&self) -> SessionService {
        SessionService::new(self.store.clone(), self.cache.clone(), self.queue.clone())
    }

    /// Profile service bound to this state
    pub fn profiles(&self) -> ProfileService {
        ProfileService::new(self.store.clone())
    }

    /// Resolves the caller's identity from the Authorization header
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<AuthUser, ApiError> {
        let header = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        authenticate_header(&self.verifier, header).map_err(ApiError::from)
    }
}
