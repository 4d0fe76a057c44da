//! # HTTP Server
//!
//! Combines the per-concern routers into the public API surface.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::conference_routes::conference_routes;
use super::config::HttpServerConfig;
use super::ops_routes::ops_routes;
use super::profile_routes::profile_routes;
use super::session_routes::session_routes;
use super::AppState;
use crate::observability::Logger;

/// The assembled API server
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Builds the server from shared state and config
    pub fn new(state: Arc<AppState>, config: HttpServerConfig) -> Self {
        let router = Self::build_router(state, &config);
        Self { config, router }
    }

    /// Assembles the combined router
    fn build_router(state: Arc<AppState>, config: &HttpServerConfig) -> Router {
        let cors = if config.cors_origins.is_empty() {
            // Permissive CORS for development deployments.
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(ops_routes(state.clone()))
            .merge(conference_routes(state.clone()))
            .merge(session_routes(state.clone()))
            .merge(profile_routes(state))
            .layer(cors)
    }

    /// Socket address the server will bind to
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Consumes the server, returning the router (for tests)
    pub fn router(self) -> Router {
        self.router
    }

    /// Binds and serves until the process exits
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        Logger::info("server_started", &[("addr", &addr.to_string())]);
        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await
    }
}
