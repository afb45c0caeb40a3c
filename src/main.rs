//! Legacy Dynamic-Array CLI
//!
//! Command-line interface over a legacy Pick/Universe-style flat file.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --data LEGACY_CLIENTS.dat read 101
//! cargo run -- --data LEGACY_CLIENTS.dat extract 101 3 1
//! cargo run -- --data LEGACY_CLIENTS.dat project 101 --latest first
//! cargo run -- --data LEGACY_CLIENTS.dat update 102 --set 2="Jane Doe" --values 3=999.99,0.00
//! cargo run -- --data LEGACY_CLIENTS.dat update 102 --json '{"2": "Jane Doe"}'
//! cargo run -- --data LEGACY_CLIENTS.dat export > clients.csv
//! ```
//!
//! Results go to stdout; logs go to stderr (`RUST_LOG=debug` for detail).
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: I/O failure (data file unreadable, backup or rewrite failed)
//! - 2: Configuration error (bad position, selector or attribute map)
//! - 3: Record not found

use legacy_dynarray::cli;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();

    // Parse command-line arguments using clap
    let args = cli::parse_args();

    let mut output = std::io::stdout();
    if let Err(e) = cli::execute(&args, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(cli::exit_code(&e));
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
