//! # Observability
//!
//! Structured JSON logging.

pub mod logger;

pub use logger::{Logger, Severity};
