//! Confero CLI entry point
//!
//! This is a minimal entrypoint: parse arguments, dispatch, print errors
//! to stderr, exit non-zero on failure. Subsystem wiring lives in the CLI
//! module.

use confero::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
