//! confero - a self-hostable conference management API server
//!
//! CRUD over an in-memory document datastore, exposed through RPC-style
//! HTTP endpoints, with a filter-translation query core and out-of-band
//! side-effect tasks.

pub mod auth;
pub mod cache;
pub mod cli;
pub mod config;
pub mod datastore;
pub mod http_server;
pub mod models;
pub mod observability;
pub mod query;
pub mod schema;
pub mod services;
pub mod tasks;
