//! # CLI Commands
//!
//! `serve` wires the store, cache, queue worker, scheduler, and HTTP server
//! together; `token` mints a development bearer token.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use super::errors::CliResult;
use crate::auth::{mint, TokenVerifier};
use crate::cache::MemoryCache;
use crate::config::ServerConfig;
use crate::datastore::Datastore;
use crate::http_server::{AppState, HttpServer};
use crate::tasks::{
    AnnouncementScheduler, EmailSender, MockEmailSender, SmtpEmailSender, TaskQueue, TaskWorker,
};

/// Starts the API server and blocks until it exits
pub fn serve(config_path: &Path) -> CliResult<()> {
    let config = ServerConfig::load(config_path)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_server(config))
}

async fn run_server(config: ServerConfig) -> CliResult<()> {
    let store = Arc::new(Datastore::new());
    let cache = Arc::new(MemoryCache::new());
    let (queue, rx) = TaskQueue::new();

    let mailer: Arc<dyn EmailSender> = match config.smtp.clone() {
        Some(smtp) => Arc::new(SmtpEmailSender::new(smtp)),
        None => Arc::new(MockEmailSender::new()),
    };
    tokio::spawn(TaskWorker::new(store.clone(), cache.clone(), mailer, rx).run());
    AnnouncementScheduler::new(
        store.clone(),
        cache.clone(),
        Duration::from_secs(config.announcement_interval_secs),
    )
    .spawn();

    let verifier = TokenVerifier::new(&config.jwt_secret);
    let state = Arc::new(AppState::new(store, cache, queue, verifier));
    HttpServer::new(state, config.http).start().await?;
    Ok(())
}

/// Mints and prints a development bearer token
pub fn token(config_path: &Path, email: &str, ttl_hours: i64) -> CliResult<()> {
    let config = ServerConfig::load(config_path)?;
    let token = mint(&config.jwt_secret, email, ttl_hours * 3600)?;
    println!("{}", token);
    Ok(())
}
