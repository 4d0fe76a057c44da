//! # Command-Line Interface

pub mod args;
pub mod commands;
pub mod errors;

pub use args::{Cli, Command};
pub use errors::{CliError, CliResult};

/// Parses arguments and dispatches to the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    match cli.command {
        Command::Serve { config } => commands::serve(&config),
        Command::Token {
            email,
            config,
            ttl_hours,
        } => commands::token(&config, &email, ttl_hours),
    }
}
