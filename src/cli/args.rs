//! CLI argument definitions using clap
//!
//! Commands:
//! - confero serve --config <path>
//! - confero token --email <addr> [--ttl-hours <n>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Confero - a self-hostable conference management API server
#[derive(Parser, Debug)]
#[command(name = "confero")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the API server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./confero.json")]
        config: PathBuf,
    },

    /// Mint a development bearer token for an email address
    Token {
        /// Email address the token identifies
        #[arg(long)]
        email: String,

        /// Path to configuration file (for the shared secret)
        #[arg(long, default_value = "./confero.json")]
        config: PathBuf,

        /// Token lifetime in hours
        #[arg(long, default_value_t = 24)]
        ttl_hours: i64,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
